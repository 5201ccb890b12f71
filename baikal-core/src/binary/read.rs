use byteorder::{ByteOrder, LittleEndian};

pub fn read_i16_le(
    buf: &[u8],
    off: &mut usize,
) -> i16 {
    let v = LittleEndian::read_i16(&buf[*off..*off + 2]);
    *off += 2;
    v
}

pub fn read_u16_le(
    buf: &[u8],
    off: &mut usize,
) -> u16 {
    let v = LittleEndian::read_u16(&buf[*off..*off + 2]);
    *off += 2;
    v
}

pub fn read_i32_le(
    buf: &[u8],
    off: &mut usize,
) -> i32 {
    let v = LittleEndian::read_i32(&buf[*off..*off + 4]);
    *off += 4;
    v
}

pub fn read_u32_le(
    buf: &[u8],
    off: &mut usize,
) -> u32 {
    let v = LittleEndian::read_u32(&buf[*off..*off + 4]);
    *off += 4;
    v
}

pub fn read_f64_le(
    buf: &[u8],
    off: &mut usize,
) -> f64 {
    let v = LittleEndian::read_f64(&buf[*off..*off + 8]);
    *off += 8;
    v
}

/// Срез фиксированной длины (строковые поля заголовков).
pub fn read_bytes<'a>(
    buf: &'a [u8],
    off: &mut usize,
    len: usize,
) -> &'a [u8] {
    let v = &buf[*off..*off + len];
    *off += len;
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances_offset() {
        let buf = [0x03, 0x00, 0xFF, 0xFF, 0x10, 0x00, 0x00, 0x00];
        let mut off = 0;

        assert_eq!(read_i16_le(&buf, &mut off), 3);
        assert_eq!(read_i16_le(&buf, &mut off), -1);
        assert_eq!(read_u32_le(&buf, &mut off), 16);
        assert_eq!(off, 8);
    }

    #[test]
    fn test_read_f64() {
        let buf = 0.01f64.to_le_bytes();
        let mut off = 0;
        assert_eq!(read_f64_le(&buf, &mut off), 0.01);
    }
}
