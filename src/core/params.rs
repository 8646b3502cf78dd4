//! Fixed-size parameter buffers.
//!
//! Some states need inputs chosen by their parent right before they start,
//! like the destination of a "move to point" behaviour. Those states carry a
//! `ParameterSlot` and the parent writes into it from `Controller::configure`.

use super::error::FsmError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fixed-capacity byte buffer that callers overwrite wholesale or in part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSlot {
    bytes: Box<[u8]>,
}

impl ParameterSlot {
    /// Create a zeroed slot of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy `src` over the start of the slot.
    ///
    /// Bytes past `src.len()` keep their previous value.
    pub fn write(&mut self, src: &[u8]) -> Result<(), FsmError> {
        if src.is_empty() {
            return Err(FsmError::EmptyParameters);
        }
        let capacity = self.capacity();
        let dst = self
            .bytes
            .get_mut(..src.len())
            .ok_or(FsmError::ParameterOverflow {
                len: src.len(),
                capacity,
            })?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Encode `value` with bincode and write it into the slot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use substate::core::ParameterSlot;
    ///
    /// let mut slot = ParameterSlot::new(16);
    /// slot.encode(&(3.5f32, -1.0f32)).unwrap();
    ///
    /// let target: (f32, f32) = slot.decode().unwrap();
    /// assert_eq!(target, (3.5, -1.0));
    /// ```
    pub fn encode<T: Serialize>(&mut self, value: &T) -> Result<(), FsmError> {
        let bytes =
            bincode::serialize(value).map_err(|e| FsmError::ParameterEncoding(e.to_string()))?;
        self.write(&bytes)
    }

    /// Decode a value previously written with [`encode`](Self::encode).
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FsmError> {
        bincode::deserialize(&self.bytes).map_err(|e| FsmError::ParameterEncoding(e.to_string()))
    }
}
