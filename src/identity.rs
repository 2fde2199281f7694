use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::AuthError;

#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn current_user(&self) -> Result<Option<Uuid>, AuthError>;

    async fn sign_in_anonymously(&self) -> Result<Uuid, AuthError>;
}

#[derive(Default)]
pub struct AnonymousAuth {
    user: Mutex<Option<Uuid>>,
}

impl AnonymousAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for AnonymousAuth {
    async fn current_user(&self) -> Result<Option<Uuid>, AuthError> {
        Ok(*self.user.lock().await)
    }

    async fn sign_in_anonymously(&self) -> Result<Uuid, AuthError> {
        let mut user = self.user.lock().await;
        match *user {
            Some(id) => Ok(id),
            None => {
                let id = Uuid::new_v4();
                *user = Some(id);
                info!(user_id = %id, "anonymous identity issued");
                Ok(id)
            }
        }
    }
}
