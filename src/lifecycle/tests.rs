use super::*;
use crate::config::{Encoding, IoParams};
use crate::error::KzError;
use crate::kernels::bitarray::packed_len;
use crate::types::ElementKind;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_every_kind_synthesizes_zero_bytes_from_null() {
    let params = IoParams::default().with_null_source();
    for kind in ElementKind::ALL {
        let mut buf = AnyBuffer::init_input(kind, &params).unwrap();
        assert_eq!(buf.kind(), kind);
        assert_eq!(buf.state(Direction::Input), BufferState::Synthesizing);

        let expected_len = match kind {
            ElementKind::Bit => packed_len(5),
            _ => 5 * kind.byte_width(),
        };
        let bytes = buf.input(5).unwrap().unwrap();
        assert_eq!(bytes.len(), expected_len, "{kind}");
        assert!(bytes.iter().all(|&b| b == 0), "{kind}");
        buf.cleanup_input(&params);
    }
}

#[test]
fn test_every_kind_discards_into_null() {
    let params = IoParams::default().with_null_destination();
    for kind in ElementKind::ALL {
        let mut buf = AnyBuffer::init_output(kind, &params).unwrap();
        assert_eq!(buf.state(Direction::Output), BufferState::Discarding);
        let data = vec![0xABu8; 3 * kind.byte_width()];
        buf.output(&data, 3).unwrap();
        assert_eq!(buf.capacity(), 0);
        buf.cleanup_output(&params).unwrap();
    }
}

#[test]
fn test_int16_text_source_through_erased_interface() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("in.txt");
    fs::write(&path, "1,2,3,4").unwrap();
    let params = IoParams::default().with_source(&path, Encoding::Text);

    let mut buf = AnyBuffer::init_input(ElementKind::Int16, &params).unwrap();
    assert_eq!(buf.state(Direction::Input), BufferState::Loaded);
    assert_eq!(buf.input(2).unwrap().unwrap(), utils_bytes(&[1i16, 2]));
    assert_eq!(buf.input(2).unwrap().unwrap(), utils_bytes(&[3i16, 4]));
    assert!(buf.input(1).unwrap().is_none());
    assert_eq!(buf.state(Direction::Input), BufferState::Exhausted);
}

#[test]
fn test_complex_output_from_bytes_flushes_as_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("iq.txt");
    let params = IoParams::default().with_destination(&path, Encoding::Text);

    let mut buf = AnyBuffer::init_output(ElementKind::Complex16, &params).unwrap();
    assert_eq!(buf.state(Direction::Output), BufferState::Accumulating);
    buf.output(utils_bytes(&[5i16, -5, 6, -6]), 2).unwrap();
    assert_eq!(buf.cursor(), 2);
    buf.cleanup_output(&params).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "5,-5,6,-6");
}

#[test]
fn test_bit_output_through_erased_interface() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bits.bin");
    let params = IoParams::default()
        .with_output_capacity(1)
        .with_destination(&path, Encoding::Binary);

    let mut buf = AnyBuffer::init_output(ElementKind::Bit, &params).unwrap();
    buf.output(&[0b0000_0110], 3).unwrap();
    buf.output(&[0b0000_0001], 1).unwrap();
    assert_eq!(buf.cursor(), 4);
    buf.cleanup_output(&params).unwrap();
    assert_eq!(fs::read(&path).unwrap(), vec![0b0000_1110]);
}

#[test]
fn test_bytes_kind_roundtrips_binary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw.bin");
    let params = IoParams::default()
        .with_destination(&path, Encoding::Binary)
        .with_source(&path, Encoding::Binary);

    let mut out = AnyBuffer::init_output(ElementKind::Bytes, &params).unwrap();
    out.output(b"kzbuf", 5).unwrap();
    out.cleanup_output(&params).unwrap();

    let mut input = AnyBuffer::init_input(ElementKind::Bytes, &params).unwrap();
    assert_eq!(input.capacity(), 5);
    assert_eq!(input.input(5).unwrap().unwrap(), b"kzbuf");
}

#[test]
fn test_ragged_output_bytes_are_rejected() {
    let params = IoParams::default();
    let mut buf = AnyBuffer::init_output(ElementKind::Int32, &params).unwrap();
    assert!(matches!(
        buf.output(&[1, 2, 3], 1),
        Err(KzError::BufferMismatch(4, 3))
    ));
}

#[test]
fn test_expect_kind_reports_mismatch() {
    let params = IoParams::default();
    let buf = AnyBuffer::init_output(ElementKind::Float64, &params).unwrap();
    buf.expect_kind(ElementKind::Float64).unwrap();
    assert!(matches!(
        buf.expect_kind(ElementKind::Float32),
        Err(KzError::KindMismatch {
            expected: ElementKind::Float32,
            got: ElementKind::Float64,
        })
    ));
}

#[test]
fn test_missing_destination_surfaces_from_any_kind() {
    let params = IoParams::default();
    let buf = AnyBuffer::init_output(ElementKind::UInt16, &params).unwrap();
    assert!(matches!(
        buf.cleanup_output(&params),
        Err(KzError::MissingDestination)
    ));
}

#[test]
fn test_state_of_typed_buffer() {
    let params = IoParams::default();
    let buf = Int32Buffer::init_input(&params).unwrap();
    assert_eq!(BufferState::of(&buf, Direction::Input), BufferState::Exhausted);
    assert_eq!(BufferState::Exhausted.to_string(), "exhausted");
}

fn utils_bytes<T: bytemuck::Pod>(values: &[T]) -> &[u8] {
    crate::utils::typed_slice_to_bytes(values)
}
