mod from_google;
mod to_google;

/// Convert from Google API types to availsync types
pub trait FromGoogle<T> {
    fn from_google(value: T) -> Self;
}

/// Convert to Google API types from availsync types
pub trait ToGoogle<T> {
    fn to_google(&self) -> T;
}
