//! Three-valued lazily resolved fields.

/// A field that may not have been looked up yet.
///
/// `Absent` and `Unresolved` must stay distinct: an origin stop has no
/// arrival time at all, which is a fact, whereas an unresolved arrival time
/// is a question still to be asked of the source.
///
/// # Examples
///
/// ```
/// use train_timetable::domain::Field;
///
/// let known: Field<u32> = Field::from(Some(3));
/// assert_eq!(known.known(), Some(Some(&3)));
///
/// let absent: Field<u32> = Field::from(None);
/// assert_eq!(absent.known(), Some(None));
///
/// let unresolved: Field<u32> = Field::Unresolved;
/// assert_eq!(unresolved.known(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// Not looked up yet. Reading it triggers resolution.
    #[default]
    Unresolved,
    /// Deliberately has no value.
    Absent,
    /// Has a concrete value.
    Present(T),
}

impl<T> Field<T> {
    /// True until the field has been resolved to a value or to absence.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Field::Unresolved)
    }

    /// True only for a concrete value.
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// `None` while unresolved, otherwise the resolved optional value.
    pub fn known(&self) -> Option<Option<&T>> {
        match self {
            Field::Unresolved => None,
            Field::Absent => Some(None),
            Field::Present(value) => Some(Some(value)),
        }
    }

    /// The concrete value, if present.
    pub fn present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Fill an unresolved field from another field.
    ///
    /// Present and absent values are never overwritten. An unresolved
    /// source settles the field as absent so it is not looked up again.
    pub fn fill_from(&mut self, source: &Field<T>)
    where
        T: Clone,
    {
        if self.is_unresolved() {
            *self = match source {
                Field::Present(value) => Field::Present(value.clone()),
                _ => Field::Absent,
            };
        }
    }

    /// Settle an unresolved field as absent.
    pub fn settle(&mut self) {
        if self.is_unresolved() {
            *self = Field::Absent;
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}
