//! Recorded sessions: a seed plus one input byte per tick.
//!
//! Layout (little-endian):
//! `magic:u32 | version:u8 | reserved:[u8; 3] | seed:u32 | frame_count:u32 |
//! inputs:[u8; frame_count] | crc32:u32`.

use crate::constants::{TAPE_FOOTER_SIZE, TAPE_HEADER_SIZE, TAPE_MAGIC, TAPE_VERSION};
use crate::error::TapeError;
use crate::input::INPUT_BITS_MASK;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapeHeader {
    pub seed: u32,
    pub frame_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TapeView<'a> {
    pub header: TapeHeader,
    pub inputs: &'a [u8],
    pub checksum: u32,
}

pub fn parse_tape(bytes: &[u8]) -> Result<TapeView<'_>, TapeError> {
    let min_len = TAPE_HEADER_SIZE + TAPE_FOOTER_SIZE;
    if bytes.len() < min_len {
        return Err(TapeError::TapeTooShort {
            actual: bytes.len(),
            min: min_len,
        });
    }

    let magic = read_u32_le(bytes, 0);
    if magic != TAPE_MAGIC {
        return Err(TapeError::InvalidMagic { found: magic });
    }

    let version = bytes[4];
    if version != TAPE_VERSION {
        return Err(TapeError::UnsupportedVersion { found: version });
    }
    if bytes[5..8].iter().any(|byte| *byte != 0) {
        return Err(TapeError::HeaderReservedNonZero);
    }

    let seed = read_u32_le(bytes, 8);
    let frame_count = read_u32_le(bytes, 12);

    let expected_len = TAPE_HEADER_SIZE + frame_count as usize + TAPE_FOOTER_SIZE;
    if bytes.len() != expected_len {
        return Err(TapeError::TapeLengthMismatch {
            expected: expected_len,
            actual: bytes.len(),
        });
    }

    let inputs_end = TAPE_HEADER_SIZE + frame_count as usize;
    let inputs = &bytes[TAPE_HEADER_SIZE..inputs_end];
    if let Some((frame, byte)) = inputs
        .iter()
        .enumerate()
        .find(|(_, byte)| (**byte & !INPUT_BITS_MASK) != 0)
    {
        return Err(TapeError::ReservedInputBitsNonZero {
            frame: frame as u32,
            byte: *byte,
        });
    }

    let checksum = read_u32_le(bytes, inputs_end);
    let computed = crc32(&bytes[..inputs_end]);
    if checksum != computed {
        return Err(TapeError::CrcMismatch {
            stored: checksum,
            computed,
        });
    }

    Ok(TapeView {
        header: TapeHeader { seed, frame_count },
        inputs,
        checksum,
    })
}

pub fn serialize_tape(seed: u32, inputs: &[u8]) -> Vec<u8> {
    let body_end = TAPE_HEADER_SIZE + inputs.len();
    let mut data = vec![0u8; body_end + TAPE_FOOTER_SIZE];

    write_u32_le(&mut data, 0, TAPE_MAGIC);
    data[4] = TAPE_VERSION;
    write_u32_le(&mut data, 8, seed);
    write_u32_le(&mut data, 12, inputs.len() as u32);
    data[TAPE_HEADER_SIZE..body_end].copy_from_slice(inputs);

    let checksum = crc32(&data[..body_end]);
    write_u32_le(&mut data, body_end, checksum);

    data
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
fn write_u32_le(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut c = i as u32;
        let mut j = 0;

        while j < 8 {
            c = if (c & 1) != 0 {
                0xEDB8_8320u32 ^ (c >> 1)
            } else {
                c >> 1
            };
            j += 1;
        }

        table[i] = c;
        i += 1;
    }

    table
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;

    for byte in data {
        let idx = ((crc ^ (*byte as u32)) & 0xFF) as usize;
        crc = CRC_TABLE[idx] ^ (crc >> 8);
    }

    crc ^ 0xFFFF_FFFFu32
}
