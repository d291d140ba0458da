use std::io::{self, Read, Seek, SeekFrom};

pub struct LittleEndianReader<R> {
    inner: R,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_u64(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a NUL-padded UTF-16LE string occupying exactly `units` code
    /// units. Stops at the first NUL unit but always consumes the full field.
    pub fn read_utf16_string(&mut self, units: usize) -> io::Result<String> {
        let mut codes = Vec::with_capacity(units);
        for _ in 0..units {
            codes.push(self.read_u16()?);
        }
        let end = codes.iter().position(|&c| c == 0).unwrap_or(units);
        String::from_utf16(&codes[..end])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn len(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(cur))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::LittleEndianReader;

    #[test]
    fn reads_little_endian_integers() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        assert_eq!(r.read_u32().expect("u32 should read"), 0x0403_0201);
        assert_eq!(r.read_u16().expect("u16 should read"), 0x0605);
        assert_eq!(r.read_u8().expect("u8 should read"), 0x07);
    }

    #[test]
    fn utf16_string_stops_at_nul_but_consumes_field() {
        let mut bytes = Vec::new();
        for c in "Melina".encode_utf16() {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 2 * 11]); // pad to 17 units
        bytes.extend_from_slice(&0xBEEFu16.to_le_bytes());

        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        let name = r.read_utf16_string(17).expect("name should decode");
        assert_eq!(name, "Melina");
        assert_eq!(r.read_u16().expect("trailer should read"), 0xBEEF);
    }
}
