/// Loading of service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased env vars
/// (`database_url` ← `DATABASE_URL`). Optional settings use `#[serde(default = "..")]`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Read the process environment.
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Read an explicit set of `(KEY, value)` pairs instead of the process environment.
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
