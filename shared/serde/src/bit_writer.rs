/// Sink for serialized bits. Bits are packed least-significant first.
pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);
    fn write_byte(&mut self, byte: u8);
}

/// Packs bits straight into a growable byte buffer. The last byte is
/// zero-padded until it fills up.
#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bits_written: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn bits_written(&self) -> u32 {
        self.bits_written
    }

    fn offset(&self) -> u32 {
        self.bits_written % 8
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        let offset = self.offset();
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << offset;
            }
        }
        self.bits_written += 1;
    }

    fn write_byte(&mut self, byte: u8) {
        let offset = self.offset();
        match self.bytes.last_mut() {
            Some(last) if offset != 0 => {
                // low bits complete the open byte, high bits start the next one
                *last |= byte << offset;
                self.bytes.push(byte >> (8 - offset));
            }
            _ => self.bytes.push(byte),
        }
        self.bits_written += 8;
    }
}
