use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde};

/// An unsigned integer written in chunks of `BITS` bits, each chunk preceded
/// by a continuation bit. Small values cost `BITS + 1` bits.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct UnsignedVariableInteger<const BITS: u8> {
    value: u64,
}

impl<const BITS: u8> UnsignedVariableInteger<BITS> {
    pub fn new<T: Into<u64>>(value: T) -> Self {
        if BITS == 0 {
            panic!("can't create an integer with 0 bits...");
        }
        if BITS > 63 {
            panic!("can't create a variable integer with chunks wider than 63 bits...");
        }

        Self {
            value: value.into(),
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    pub fn set<T: Into<u64>>(&mut self, value: T) {
        self.value = value.into();
    }
}

impl<const BITS: u8> Serde for UnsignedVariableInteger<BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value = self.value;
        loop {
            let proceed = value >= (1u64 << BITS);
            writer.write_bit(proceed);
            for _ in 0..BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let proceed = reader.read_bit()?;

            for _ in 0..BITS {
                let bit = reader.read_bit()?;
                if shift >= 64 {
                    if bit {
                        return Err(SerdeErr::InvalidTag {
                            what: "variable integer width",
                            value: shift as u64,
                        });
                    }
                } else if bit {
                    output |= 1u64 << shift;
                }
                shift += 1;
            }

            if !proceed {
                return Ok(Self { value: output });
            }
        }
    }

    fn bit_length(&self) -> u32 {
        let mut output: u32 = 0;
        let mut value = self.value;
        loop {
            let proceed = value >= (1u64 << BITS);
            output += 1 + BITS as u32;
            value >>= BITS;
            if !proceed {
                return output;
            }
        }
    }
}
