use ufmt::{uDisplay, uWrite, Formatter};

/// Splits a pin position into its byte index and the bit index within that byte
pub const fn locate(position: usize) -> (usize, u8) {
    (position / 8, (position % 8) as u8)
}

/// Returns the value of the bit at `position`, or `None` when the position
/// lies past the end of `data`
pub fn bit_read(data: &[u8], position: usize) -> Option<bool> {
    let (byte, bit) = locate(position);
    data.get(byte).map(|b| b & (1 << bit) != 0)
}

/// Sets or clears the bit at `position`. Returns `None` without touching
/// `data` when the position is out of range
pub fn bit_write(data: &mut [u8], position: usize, value: bool) -> Option<()> {
    let (byte, bit) = locate(position);
    let byte = data.get_mut(byte)?;
    if value{
        *byte |= 1 << bit;
    }
    else{
        *byte &= !(1 << bit);
    }
    Some(())
}

/// Breaks down a u8 to its set of 8 bits, index 0 being the least significant bit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bits{
    src: u8,
    bits_boolean: [bool;8],
}

impl Bits{
    /// Given a byte (u8) creates a Bits structure
    pub fn new(src: &u8) -> Bits {
        let src = *src;
        let mut bits_boolean = [false;8];
        for (bit, value) in bits_boolean.iter_mut().enumerate(){
            let mask = 1u8 << bit;
            *value = src & mask == mask;
        }

        Bits{
            src,
            bits_boolean,
        }
    }
    /// Gets the associated byte
    pub fn byte(&self) -> u8 {
        self.src
    }
    /// Gets the bits as a list of bools
    pub fn bits_boolean(&self) -> &[bool; 8] {
        &self.bits_boolean
    }
    /// Returns if a particular bit is set. Indices past 7 are never set
    pub fn is_set(&self, bit_index: usize) -> bool {
        self.bits_boolean.get(bit_index).copied().unwrap_or(false)
    }
    /// Iterates the indices of the set bits in ascending order
    pub fn set_indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits_boolean
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(|(bit, _)| bit as u8)
    }
}

impl Default for Bits{
    fn default() -> Self {
        Self::new(&0)
    }
}

impl From<u8> for Bits{
    fn from(src: u8) -> Self {
        Self::new(&src)
    }
}

/// Prints a buffer as space separated groups of eight binary digits, most
/// significant bit first (`00000101 10000000`)
pub struct BinaryBytes<'a>(pub &'a [u8]);

impl uDisplay for BinaryBytes<'_> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for bit in (0..8).rev() {
                if byte & (1 << bit) != 0 {
                    f.write_str("1")?;
                } else {
                    f.write_str("0")?;
                }
            }
        }
        Ok(())
    }
}
