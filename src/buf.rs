use std::mem::size_of;

use bytes::Buf;

use crate::error::Error;

macro_rules! ensure_remaining {
    ($buf:expr, $len:expr) => {
        if $buf.remaining() < $len {
            return Err(Error::BadMessage(format!(
                "need {} bytes, {} remaining",
                $len,
                $buf.remaining()
            )));
        }
    };
}

/// Bounds-checked reads. Kept clear of the `Buf::try_get_*` names
pub trait TryBuf: Buf {
    fn try_read_i32(&mut self) -> Result<i32, Error>;
    fn try_read_array<const N: usize>(&mut self) -> Result<[u8; N], Error>;
    fn try_read_text(&mut self) -> Result<String, Error>;
}

impl<T: Buf> TryBuf for T {
    fn try_read_i32(&mut self) -> Result<i32, Error> {
        ensure_remaining!(self, size_of::<i32>());
        Ok(self.get_i32())
    }

    fn try_read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        ensure_remaining!(self, N);
        let mut array = [0; N];
        self.copy_to_slice(&mut array);
        Ok(array)
    }

    /// Consumes the rest of the buffer as text, dropping the NUL padding
    /// servers append to textual replies.
    fn try_read_text(&mut self) -> Result<String, Error> {
        let bytes = self.copy_to_bytes(self.remaining());
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::BadMessage("reply is not valid UTF-8".to_owned()))?;
        Ok(text.trim_end_matches('\0').to_owned())
    }
}
