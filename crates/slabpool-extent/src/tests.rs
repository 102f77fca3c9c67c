use super::*;
use slabpool_sys::prelude::*;

#[test]
fn test_extent_new() {
  let ps = page_size();
  let extent = Extent::new(ps);
  assert!(extent.is_ok());
  let extent = extent.unwrap();
  assert_eq!(extent.len(), ps);
  assert_eq!(extent.mapped(), ps);
  assert_eq!(is_page_aligned(extent.addr()), Ok(true));
}

#[test]
fn test_extent_rounds_mapping_up() {
  let ps = page_size();
  let extent = Extent::new(ps + 1).unwrap();
  assert_eq!(extent.len(), ps + 1);
  assert_eq!(extent.mapped(), ps * 2);
}

#[test]
fn test_extent_zero_size() {
  let extent = Extent::new(0);
  assert!(extent.is_ok());
  let extent = extent.unwrap();
  assert!(extent.is_empty());
  assert_eq!(extent.as_ref().len(), 0);
}

#[test]
fn test_extent_zero_filled() {
  let extent = Extent::new(8192).unwrap();
  assert!(extent.as_ref().iter().all(|&b| b == 0));
}

#[test]
fn test_extent_as_mut() {
  let ps = page_size();
  let mut extent = Extent::new(ps).unwrap();
  let slice = extent.as_mut();
  assert_eq!(slice.len(), ps);
  slice[0] = 42;
  assert_eq!(extent.as_ref()[0], 42);
}

#[test]
fn test_extent_address_is_stable() {
  let extent = Extent::new(4096).unwrap();
  let before = extent.addr();
  let moved = extent;
  assert_eq!(moved.addr(), before);
}

#[test]
fn test_extent_whole_mapping_is_writable() {
  let ps = page_size();
  let mut extent = Extent::new(ps * 2).unwrap();
  let slice = extent.as_mut();
  slice[0] = 1;
  slice[ps] = 2;
  slice[ps * 2 - 1] = 3;
  assert_eq!((slice[0], slice[ps], slice[ps * 2 - 1]), (1, 2, 3));
}
