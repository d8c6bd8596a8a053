use std::ops::Deref;
use std::sync::Arc;

use vodca::References;

use application::service::CheckoutPolicy;
use driver::database::PostgresDatabase;
use kernel::KernelError;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new(config: &ServerConfig) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    checkout_policy: CheckoutPolicy,
}

impl Handler {
    pub async fn init(config: &ServerConfig) -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;

        Ok(Self {
            pgpool,
            checkout_policy: config.checkout.clone(),
        })
    }
}
