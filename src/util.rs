pub(crate) struct BytesReader<'a> {
    buf: &'a [u8],
    idx: usize,
}

impl<'a> BytesReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, idx: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.idx == self.buf.len()
    }

    pub fn next(&mut self) -> Option<u8> {
        if self.idx < self.buf.len() {
            let val = self.buf[self.idx];
            self.idx += 1;
            Some(val)
        } else {
            None
        }
    }

    pub fn next_n(&mut self, n: usize) -> &'a [u8] {
        let end_idx = (self.idx + n).min(self.buf.len());
        let data = &self.buf[self.idx..end_idx];
        self.idx = end_idx;
        data
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.idx..]
    }
}

/// Helper function to get a fixed-size array at the start of an immutable slice
pub(crate) fn ref_array_start<const N: usize>(buf: &[u8]) -> Option<&[u8; N]> {
    let len = buf.len();
    (&buf[..N.min(len)]).try_into().ok()
}

/// Helper function to get a fixed-size array at the start of a mutable slice
pub(crate) fn mut_array_start<const N: usize>(buf: &mut [u8]) -> Option<&mut [u8; N]> {
    let len = buf.len();
    (&mut buf[..N.min(len)]).try_into().ok()
}

/// Reads the little-endian `f32` at a fixed offset of a validated payload.
pub(crate) fn f32_at<const N: usize>(data: &[u8; N], offset: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    f32::from_le_bytes(bytes)
}

/// Writes a little-endian `f32` at a fixed offset of a validated payload.
pub(crate) fn put_f32_at<const N: usize>(data: &mut [u8; N], offset: usize, value: f32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
