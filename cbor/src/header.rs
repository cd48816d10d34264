/*!
Item header framing and big-endian numeric packing.

Every item starts with one byte: the top 3 bits are the major type, the low 5
bits the "additional info".  Additional info 24..=27 announce a 1, 2, 4 or 8
byte big-endian trailer carrying the real count or value.
*/

/// Largest count or magnitude stored inline in the additional info.
pub const MAX_INLINE: u64 = 22;

pub const INFO_UINT8: u8 = 24;
pub const INFO_UINT16: u8 = 25;
pub const INFO_UINT32: u8 = 26;
pub const INFO_UINT64: u8 = 27;
pub const INFO_INDEFINITE: u8 = 31;

pub const SIMPLE_FALSE: u8 = 20;
pub const SIMPLE_TRUE: u8 = 21;
pub const SIMPLE_NULL: u8 = 22;
pub const SIMPLE_UNDEFINED: u8 = 23;
pub const SIMPLE_FLOAT16: u8 = 25;
pub const SIMPLE_FLOAT32: u8 = 26;
pub const SIMPLE_FLOAT64: u8 = 27;

/// RFC 8949 "expected conversion to base64" tag.
pub const TAG_EXPECTED_BASE64: u64 = 34;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Major {
    UnsignedInteger = 0,
    NegativeInteger = 1,
    ByteString = 2,
    TextString = 3,
    Sequence = 4,
    Map = 5,
    Tagged = 6,
    SimpleOrFloat = 7,
}

impl Major {
    const ALL: [Major; 8] = [
        Major::UnsignedInteger,
        Major::NegativeInteger,
        Major::ByteString,
        Major::TextString,
        Major::Sequence,
        Major::Map,
        Major::Tagged,
        Major::SimpleOrFloat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Major::UnsignedInteger => "Unsigned Integer",
            Major::NegativeInteger => "Negative Integer",
            Major::ByteString => "Byte String",
            Major::TextString => "Text String",
            Major::Sequence => "Sequence",
            Major::Map => "Map",
            Major::Tagged => "Tagged Value",
            Major::SimpleOrFloat => "Simple Value or Float",
        }
    }
}

impl core::fmt::Display for Major {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
pub fn write_header(major: Major, info: u8) -> u8 {
    ((major as u8) << 5) | (info & 0x1F)
}

#[inline]
pub fn read_header(byte: u8) -> (Major, u8) {
    (Major::ALL[(byte >> 5) as usize], byte & 0x1F)
}

/// Number of trailer bytes following a header with the given additional info.
#[inline]
pub fn trailer_len(info: u8) -> usize {
    match info {
        INFO_UINT8 => 1,
        INFO_UINT16 => 2,
        INFO_UINT32 => 4,
        INFO_UINT64 => 8,
        _ => 0,
    }
}

/// Pick the additional info for a count or magnitude: the value itself when
/// small enough, otherwise the narrowest trailer that holds it.
pub fn uint_info(val: u64) -> u8 {
    if val <= MAX_INLINE {
        val as u8
    } else if val <= u8::MAX as u64 {
        INFO_UINT8
    } else if val <= u16::MAX as u64 {
        INFO_UINT16
    } else if val <= u32::MAX as u64 {
        INFO_UINT32
    } else {
        INFO_UINT64
    }
}

/// Append `val` big-endian using `width` bytes (1, 2, 4 or 8); the caller
/// guarantees the value fits.
pub fn pack_uint(width: usize, val: u64, out: &mut alloc::vec::Vec<u8>) {
    match width {
        1 => out.push(val as u8),
        2 => out.extend((val as u16).to_be_bytes()),
        4 => out.extend((val as u32).to_be_bytes()),
        _ => out.extend(val.to_be_bytes()),
    }
}

/// Read a big-endian unsigned integer of 1, 2, 4 or 8 bytes.
pub fn unpack_uint(data: &[u8]) -> Option<u64> {
    Some(match data.len() {
        1 => data[0] as u64,
        2 => u16::from_be_bytes(data.try_into().ok()?) as u64,
        4 => u32::from_be_bytes(data.try_into().ok()?) as u64,
        8 => u64::from_be_bytes(data.try_into().ok()?),
        _ => return None,
    })
}

#[inline]
pub fn pack_f32(val: f32) -> [u8; 4] {
    val.to_be_bytes()
}

#[inline]
pub fn pack_f64(val: f64) -> [u8; 8] {
    val.to_be_bytes()
}

#[inline]
pub fn unpack_f32(data: &[u8]) -> Option<f32> {
    Some(f32::from_be_bytes(data.try_into().ok()?))
}

#[inline]
pub fn unpack_f64(data: &[u8]) -> Option<f64> {
    Some(f64::from_be_bytes(data.try_into().ok()?))
}
