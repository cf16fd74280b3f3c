use crate::LayoutError;
use crate::constants::elements_per_data_block;

/// A fixed-width value packed into data blocks.
pub trait BlockElement: Sized {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// How many elements one data block holds.
    const PER_BLOCK: usize = elements_per_data_block(Self::SIZE);

    /// Writes the element into `buf`, which is exactly [`Self::SIZE`] bytes.
    fn serialize_into(&self, buf: &mut [u8]);

    fn deserialize(buf: &[u8]) -> Result<Self, LayoutError>;
}
