use byteorder::{ByteOrder, LittleEndian};

pub fn write_i16_le(
    buf: &mut [u8],
    off: &mut usize,
    val: i16,
) {
    LittleEndian::write_i16(&mut buf[*off..*off + 2], val);
    *off += 2;
}

pub fn write_u16_le(
    buf: &mut [u8],
    off: &mut usize,
    val: u16,
) {
    LittleEndian::write_u16(&mut buf[*off..*off + 2], val);
    *off += 2;
}

pub fn write_i32_le(
    buf: &mut [u8],
    off: &mut usize,
    val: i32,
) {
    LittleEndian::write_i32(&mut buf[*off..*off + 4], val);
    *off += 4;
}

pub fn write_u32_le(
    buf: &mut [u8],
    off: &mut usize,
    val: u32,
) {
    LittleEndian::write_u32(&mut buf[*off..*off + 4], val);
    *off += 4;
}

pub fn write_f64_le(
    buf: &mut [u8],
    off: &mut usize,
    val: f64,
) {
    LittleEndian::write_f64(&mut buf[*off..*off + 8], val);
    *off += 8;
}

/// Записывает строку в поле фиксированной длины, дополняя нулями.
///
/// Лишние байты обрезаются.
pub fn write_padded(
    buf: &mut [u8],
    off: &mut usize,
    len: usize,
    val: &[u8],
) {
    let n = val.len().min(len);
    buf[*off..*off + n].copy_from_slice(&val[..n]);
    buf[*off + n..*off + len].fill(0);
    *off += len;
}
