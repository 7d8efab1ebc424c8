//! Monotonic id sequences.
//!
//! Every sequence starts at 1 and only ever moves forward, so an id that has
//! been handed out is never handed out again, even after the record it named
//! is gone.

use crate::model::Id;
use derive_where::derive_where;
use std::marker::PhantomData;
use thiserror::Error;

pub const FIRST_ID: u64 = 1;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The id sequence is exhausted")]
pub struct SequenceExhaustedError;

#[derive_where(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct IdSequence<Marker> {
    next: Option<u64>,
    phantom_data: PhantomData<Marker>,
}

impl<Marker> IdSequence<Marker> {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(FIRST_ID)
    }

    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Some(first),
            phantom_data: PhantomData,
        }
    }

    /// The id the next call to [`IdSequence::generate`] will return.
    #[must_use]
    pub fn peek(&self) -> Option<Id<Marker>> {
        self.next.map(Id::from)
    }

    pub fn generate(&mut self) -> Result<Id<Marker>, SequenceExhaustedError> {
        let current = self.next.ok_or(SequenceExhaustedError)?;
        self.next = current.checked_add(1);

        Ok(current.into())
    }
}

impl<Marker> Default for IdSequence<Marker> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::Id,
        sequence::{IdSequence, SequenceExhaustedError},
    };

    struct TestMarker;

    #[test]
    fn starts_at_one() {
        let mut sequence = IdSequence::<TestMarker>::new();
        assert_eq!(sequence.peek(), Some(Id::from(1)));
        assert_eq!(sequence.generate(), Ok(Id::from(1)));
        assert_eq!(sequence.generate(), Ok(Id::from(2)));
        assert_eq!(sequence.peek(), Some(Id::from(3)));
    }

    #[test]
    fn strictly_increasing() {
        let mut sequence = IdSequence::<TestMarker>::new();
        let mut previous = sequence.generate().unwrap();

        for _ in 0..100 {
            let next = sequence.generate().unwrap();
            assert!(u64::from(next) > u64::from(previous));
            previous = next;
        }
    }

    #[test]
    fn exhaustion() {
        let mut sequence = IdSequence::<TestMarker>::starting_at(u64::MAX);
        assert_eq!(sequence.generate(), Ok(Id::from(u64::MAX)));
        assert_eq!(sequence.peek(), None);
        assert_eq!(sequence.generate(), Err(SequenceExhaustedError));
        assert_eq!(sequence.generate(), Err(SequenceExhaustedError));
    }
}
