//! Data-point encoding and decoding
//!
//! Status reports and commands carry a sequence of typed entries:
//! ```text
//! ┌──────┬──────┬────────────┬─────────────┐
//! │ DPID │ TYPE │ LENGTH(BE) │ VALUE       │
//! │ 1B   │ 1B   │ 2B         │ LENGTH B    │
//! └──────┴──────┴────────────┴─────────────┘
//! ```
//!
//! Only boolean (1 byte) and numeric/enumerated (4 bytes, big-endian) values
//! are decoded. Other type/length combinations are stepped over.

use heapless::Vec;

use crate::frame::FrameError;

// Wire format type bytes
pub const DP_TYPE_BOOL: u8 = 0x01;
pub const DP_TYPE_VALUE: u8 = 0x02;
pub const DP_TYPE_ENUM: u8 = 0x04;

/// DPID + TYPE + LENGTH
pub const DP_HEADER_LEN: usize = 4;

/// Longest value length accepted before an entry is treated as corrupt
pub const MAX_DP_VALUE_LEN: usize = 8;

/// Largest encoded entry this crate produces (4-byte value)
pub const MAX_DP_ENCODED_LEN: usize = DP_HEADER_LEN + 4;

/// Data-point value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DpType {
    /// Boolean, 1-byte value
    Bool,
    /// Numeric, 4-byte big-endian value
    Value,
    /// Enumerated, 4-byte big-endian value
    Enum,
}

impl DpType {
    /// Parse a type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            DP_TYPE_BOOL => Some(DpType::Bool),
            DP_TYPE_VALUE => Some(DpType::Value),
            DP_TYPE_ENUM => Some(DpType::Enum),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            DpType::Bool => DP_TYPE_BOOL,
            DpType::Value => DP_TYPE_VALUE,
            DpType::Enum => DP_TYPE_ENUM,
        }
    }

    /// Length of the value field for this type
    pub fn value_len(self) -> usize {
        match self {
            DpType::Bool => 1,
            DpType::Value | DpType::Enum => 4,
        }
    }
}

/// A typed, identified attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataPoint {
    /// Data-point identifier
    pub id: u8,
    /// Value type
    pub dp_type: DpType,
    /// Value; booleans carry the raw byte
    pub value: u32,
}

impl DataPoint {
    /// Create a boolean data point
    pub const fn boolean(id: u8, on: bool) -> Self {
        Self {
            id,
            dp_type: DpType::Bool,
            value: on as u32,
        }
    }

    /// Create a numeric data point
    pub const fn value(id: u8, value: u32) -> Self {
        Self {
            id,
            dp_type: DpType::Value,
            value,
        }
    }

    /// Create an enumerated data point
    pub const fn enumeration(id: u8, value: u32) -> Self {
        Self {
            id,
            dp_type: DpType::Enum,
            value,
        }
    }

    /// Value interpreted as a boolean
    pub fn as_bool(&self) -> bool {
        self.value != 0
    }

    /// Encoded size of this entry
    pub fn encoded_len(&self) -> usize {
        DP_HEADER_LEN + self.dp_type.value_len()
    }

    /// Encode this entry into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let value_len = self.dp_type.value_len() as u16;
        buffer[0] = self.id;
        buffer[1] = self.dp_type.to_byte();
        buffer[2..4].copy_from_slice(&value_len.to_be_bytes());
        match self.dp_type {
            DpType::Bool => buffer[4] = self.as_bool() as u8,
            DpType::Value | DpType::Enum => buffer[4..8].copy_from_slice(&self.value.to_be_bytes()),
        }

        Ok(len)
    }

    /// Encode this entry as a standalone payload
    pub fn to_payload(&self) -> Result<Vec<u8, MAX_DP_ENCODED_LEN>, FrameError> {
        let mut buffer = [0u8; MAX_DP_ENCODED_LEN];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Decode the data points of a status-report payload
///
/// Only the first `declared_len` bytes of `payload` are considered. The
/// returned iterator stops at the first malformed entry; entries already
/// yielded stay valid.
pub fn decode(payload: &[u8], declared_len: usize) -> DataPoints<'_> {
    let end = declared_len.min(payload.len());
    DataPoints {
        data: &payload[..end],
        pos: 0,
    }
}

/// Iterator over the data points of a payload
#[derive(Debug, Clone)]
pub struct DataPoints<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DataPoints<'a> {
    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn stop(&mut self) -> Option<DataPoint> {
        self.pos = self.data.len();
        None
    }
}

impl<'a> Iterator for DataPoints<'a> {
    type Item = DataPoint;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining() == 0 {
                return None;
            }
            if self.remaining() < DP_HEADER_LEN {
                debug!("{} trailing bytes after last data point", self.remaining());
                return self.stop();
            }

            let data = self.data;
            let entry = &data[self.pos..];
            let id = entry[0];
            let type_byte = entry[1];
            let len = u16::from_be_bytes([entry[2], entry[3]]) as usize;

            if len > MAX_DP_VALUE_LEN || DP_HEADER_LEN + len > entry.len() {
                debug!("malformed data point {}: length {}", id, len);
                return self.stop();
            }

            let value = &entry[DP_HEADER_LEN..DP_HEADER_LEN + len];
            self.pos += DP_HEADER_LEN + len;

            match (DpType::from_byte(type_byte), len) {
                (Some(DpType::Bool), 1) => {
                    return Some(DataPoint {
                        id,
                        dp_type: DpType::Bool,
                        value: value[0] as u32,
                    });
                }
                (Some(dp_type @ (DpType::Value | DpType::Enum)), 4) => {
                    return Some(DataPoint {
                        id,
                        dp_type,
                        value: u32::from_be_bytes([value[0], value[1], value[2], value[3]]),
                    });
                }
                _ => {
                    debug!(
                        "skipping data point {}: type {=u8:#x}, length {}",
                        id,
                        type_byte,
                        len
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec as StdVec;

    fn collect(payload: &[u8]) -> StdVec<DataPoint> {
        decode(payload, payload.len()).collect()
    }

    #[test]
    fn test_decode_bool_then_value() {
        let payload = [
            0x01, 0x01, 0x00, 0x01, 0x01, // switch on
            0x03, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x04, // speed 4
        ];
        let points = collect(&payload);

        assert_eq!(
            points,
            [DataPoint::boolean(1, true), DataPoint::value(3, 4)]
        );
    }

    #[test]
    fn test_decode_enum_big_endian() {
        let payload = [0x13, 0x04, 0x00, 0x04, 0x01, 0x02, 0x03, 0x04];
        let points = collect(&payload);

        assert_eq!(points, [DataPoint::enumeration(0x13, 0x0102_0304)]);
    }

    #[test]
    fn test_truncated_entry_keeps_earlier_points() {
        let payload = [
            0x01, 0x01, 0x00, 0x01, 0x00, // switch off
            0x03, 0x02, 0x00, 0x04, 0x00, 0x00, // value cut short
        ];
        let points = collect(&payload);

        assert_eq!(points, [DataPoint::boolean(1, false)]);
    }

    #[test]
    fn test_insane_length_stops() {
        let payload = [
            0x08, 0x04, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, // direction reverse
            0x09, 0x00, 0x00, 0x09, 0, 0, 0, 0, 0, 0, 0, 0, 0, // raw, 9 bytes
            0x01, 0x01, 0x00, 0x01, 0x01,
        ];
        let points = collect(&payload);

        assert_eq!(points, [DataPoint::enumeration(8, 1)]);
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let payload = [
            0x65, 0x03, 0x00, 0x02, b'h', b'i', // string
            0x02, 0x04, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, // mode sleep
        ];
        let points = collect(&payload);

        assert_eq!(points, [DataPoint::enumeration(2, 2)]);
    }

    #[test]
    fn test_wrong_length_for_type_is_skipped() {
        let payload = [
            0x01, 0x01, 0x00, 0x02, 0x00, 0x01, // bool with 2 bytes
            0x10, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x05,
        ];
        let points = collect(&payload);

        assert_eq!(points, [DataPoint::value(0x10, 5)]);
    }

    #[test]
    fn test_declared_length_bounds_decoding() {
        let payload = [
            0x01, 0x01, 0x00, 0x01, 0x01, //
            0x0F, 0x01, 0x00, 0x01, 0x01,
        ];
        let points: StdVec<_> = decode(&payload, 5).collect();

        assert_eq!(points, [DataPoint::boolean(1, true)]);
        assert_eq!(decode(&payload, 64).count(), 2);
    }

    #[test]
    fn test_short_header_stops() {
        let payload = [0x01, 0x01, 0x00, 0x01, 0x01, 0x02, 0x04];
        let mut points = decode(&payload, payload.len());

        assert_eq!(points.next(), Some(DataPoint::boolean(1, true)));
        assert_eq!(points.next(), None);
        assert_eq!(points.remaining(), 0);
    }

    #[test]
    fn test_bool_keeps_raw_byte() {
        let payload = [0x0F, 0x01, 0x00, 0x01, 0x02];
        let points = collect(&payload);

        assert_eq!(points[0].value, 2);
        assert!(points[0].as_bool());
    }

    #[test]
    fn test_encode_bool() {
        let payload = DataPoint::boolean(15, true).to_payload().unwrap();
        assert_eq!(payload.as_slice(), &[0x0F, 0x01, 0x00, 0x01, 0x01]);
    }

    #[test]
    fn test_encode_value() {
        let payload = DataPoint::value(3, 5).to_payload().unwrap();
        assert_eq!(
            payload.as_slice(),
            &[0x03, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x05]
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buffer = [0u8; 5];
        assert_eq!(
            DataPoint::enumeration(2, 1).encode(&mut buffer),
            Err(FrameError::BufferTooSmall)
        );
    }

    #[test]
    fn test_encoded_entries_decode() {
        let points = [
            DataPoint::boolean(1, true),
            DataPoint::enumeration(2, 1),
            DataPoint::value(3, 5),
        ];
        let mut payload = StdVec::new();
        for point in &points {
            payload.extend_from_slice(&point.to_payload().unwrap());
        }

        assert_eq!(collect(&payload), points);
    }

    #[test]
    fn test_type_bytes() {
        for dp_type in [DpType::Bool, DpType::Value, DpType::Enum] {
            assert_eq!(DpType::from_byte(dp_type.to_byte()), Some(dp_type));
        }
        assert_eq!(DpType::from_byte(0x00), None);
        assert_eq!(DpType::from_byte(0x03), None);
    }
}
