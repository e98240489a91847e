pub mod opengl;

/// # Safety
///
/// This function will reinterpret any slice as a byte slice.
/// Use with slices of number primitives.
pub unsafe fn byte_slice_from<T: Copy>(data: &[T]) -> &[u8] {
    let data_ptr = data.as_ptr() as *const u8;
    std::slice::from_raw_parts(data_ptr, data.len() * std::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_slice_covers_the_whole_slice() {
        let data: [f32; 4] = [1.0, 2.0, 3.0, 4.0];
        let bytes = unsafe { byte_slice_from(&data) };
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn byte_slice_preserves_native_layout() {
        let data: [u32; 2] = [1, 0xFF00_0000];
        let bytes = unsafe { byte_slice_from(&data) };
        let expected = data
            .iter()
            .flat_map(|value| value.to_ne_bytes().to_vec())
            .collect::<Vec<u8>>();
        assert_eq!(bytes, expected.as_slice());
    }

    #[test]
    fn empty_slice_yields_no_bytes() {
        let data: [f32; 0] = [];
        let bytes = unsafe { byte_slice_from(&data) };
        assert!(bytes.is_empty());
    }
}
