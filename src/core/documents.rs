use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads and decodes a JSON document. A missing document is `Ok(None)`.
pub async fn load_document<S, T>(storage: &S, path: &str) -> Result<Option<T>>
where
    S: Storage,
    T: DeserializeOwned,
{
    let data = match storage.read_file(path).await {
        Ok(data) => data,
        Err(e) if e.is_not_found() => {
            tracing::debug!("No document at '{}'", path);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let document = serde_json::from_slice(&data)?;
    tracing::debug!("Loaded document '{}' ({} bytes)", path, data.len());
    Ok(Some(document))
}

pub async fn save_document<S, T>(storage: &S, path: &str, document: &T) -> Result<()>
where
    S: Storage,
    T: Serialize + ?Sized,
{
    let data = serde_json::to_vec_pretty(document)?;
    storage.write_file(path, &data).await?;
    tracing::debug!("Saved document '{}' ({} bytes)", path, data.len());
    Ok(())
}

/// Deletes a document, treating an already missing one as deleted.
pub async fn delete_document<S: Storage>(storage: &S, path: &str) -> Result<()> {
    match storage.delete_file(path).await {
        Err(e) if e.is_not_found() => Ok(()),
        other => other,
    }
}
