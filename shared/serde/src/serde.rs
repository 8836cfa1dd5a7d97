use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr,
    integer::UnsignedVariableInteger,
};

/// A type that can write itself to, and read itself from, a bit stream.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut dyn BitWrite);
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;
    fn bit_length(&self) -> u32;
}

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }

    fn bit_length(&self) -> u32 {
        1
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }

    fn bit_length(&self) -> u32 {
        8
    }
}

macro_rules! impl_serde_for_le_integer {
    ($type:ty) => {
        impl Serde for $type {
            fn ser(&self, writer: &mut dyn BitWrite) {
                for byte in self.to_le_bytes() {
                    writer.write_byte(byte);
                }
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$type>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$type>::from_le_bytes(bytes))
            }

            fn bit_length(&self) -> u32 {
                (std::mem::size_of::<$type>() * 8) as u32
            }
        }
    };
}

impl_serde_for_le_integer!(u16);
impl_serde_for_le_integer!(u32);
impl_serde_for_le_integer!(u64);

impl Serde for f64 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(f64::from_bits(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        64
    }
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.len() as u64).ser(writer);
        for byte in self.as_bytes() {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::<7>::de(reader)?.get() as usize;
        let mut bytes = Vec::with_capacity(length.min(reader.bits_remaining() as usize / 8));
        for _ in 0..length {
            bytes.push(reader.read_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8)
    }

    fn bit_length(&self) -> u32 {
        UnsignedVariableInteger::<7>::new(self.len() as u64).bit_length() + (self.len() as u32 * 8)
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                writer.write_bit(true);
                value.ser(writer);
            }
            None => writer.write_bit(false),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }

    fn bit_length(&self) -> u32 {
        match self {
            Some(value) => 1 + value.bit_length(),
            None => 1,
        }
    }
}

impl<T: Serde, const N: usize> Serde for [T; N] {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for value in self {
            value.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut values = Vec::with_capacity(N);
        for _ in 0..N {
            values.push(T::de(reader)?);
        }
        match values.try_into() {
            Ok(array) => Ok(array),
            Err(_) => unreachable!("exactly N values were read"),
        }
    }

    fn bit_length(&self) -> u32 {
        self.iter().map(Serde::bit_length).sum()
    }
}
