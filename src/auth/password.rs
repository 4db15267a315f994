use super::AuthError;

/// bcrypt is CPU bound; both helpers run on the blocking pool.
pub async fn hash(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(AuthError::from)
}

pub async fn verify(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(AuthError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hashed = hash("correct horse", 4).await.unwrap();
        assert!(verify("correct horse", &hashed).await.unwrap());
        assert!(!verify("battery staple", &hashed).await.unwrap());
    }
}
