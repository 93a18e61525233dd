//! # Storefront Context
//!
//! One explicitly constructed object holding every session collaborator.
//! Created at session start, passed to whatever renders the storefront and
//! torn down with [`StorefrontContext::shutdown`].
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StorefrontContext                                │
//! │                                                                         │
//! │  config ─────────── StorefrontConfig (read-only after start)            │
//! │  auth ───────────── AuthStore ──► Arc<dyn AuthApi>                      │
//! │                               ├─► Arc<dyn TokenStore>                   │
//! │                               └─► Arc<dyn Navigator> ◄──┐               │
//! │  toasts ─────────── ToastStore (cheap to clone)          │               │
//! │  catalog ────────── Mutex<ProductCatalog>                │ shared        │
//! │  catalog_source ─── Arc<dyn CatalogSource>               │               │
//! │  navigator ─────────────────────────────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog mutex is only ever held for synchronous work; `load_catalog`
//! drops it before awaiting the data source.

use std::sync::{Arc, Mutex};

use storefront_core::ProductCatalog;
use tracing::{error, info};

use crate::api::{AuthApi, CatalogSource, HttpStorefrontApi};
use crate::auth::AuthStore;
use crate::config::StorefrontConfig;
use crate::error::SessionResult;
use crate::navigation::{GuardOutcome, HistoryNavigator, Navigator, RouteGuard};
use crate::toast::ToastStore;
use crate::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// The external collaborators a context is built from.
pub struct Services {
    pub auth_api: Arc<dyn AuthApi>,
    pub catalog_source: Arc<dyn CatalogSource>,
    pub tokens: Arc<dyn TokenStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl Services {
    /// HTTP data source, file token store and a recording navigator.
    ///
    /// Falls back to an in-memory token store when no data directory exists.
    pub fn http(config: &StorefrontConfig) -> SessionResult<Self> {
        let api = Arc::new(HttpStorefrontApi::new(&config.api)?);

        let tokens: Arc<dyn TokenStore> = match config.token_path() {
            Some(path) => Arc::new(FileTokenStore::new(path, config.token_max_age())),
            None => Arc::new(MemoryTokenStore::new()),
        };

        Ok(Services {
            auth_api: api.clone(),
            catalog_source: api,
            tokens,
            navigator: Arc::new(HistoryNavigator::new()),
        })
    }
}

pub struct StorefrontContext {
    config: StorefrontConfig,
    auth: AuthStore,
    toasts: ToastStore,
    catalog: Mutex<ProductCatalog>,
    catalog_source: Arc<dyn CatalogSource>,
    navigator: Arc<dyn Navigator>,
}

impl StorefrontContext {
    pub fn new(config: StorefrontConfig, services: Services) -> SessionResult<Self> {
        config.validate()?;

        let catalog = ProductCatalog::new(config.catalog.items_per_page)?;
        let auth = AuthStore::new(
            services.auth_api,
            services.tokens,
            services.navigator.clone(),
            config.login_path(),
        );
        let toasts = ToastStore::new(config.toast_duration());

        Ok(StorefrontContext {
            config,
            auth,
            toasts,
            catalog: Mutex::new(catalog),
            catalog_source: services.catalog_source,
            navigator: services.navigator,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn toasts(&self) -> &ToastStore {
        &self.toasts
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Runs `f` against the catalog under its lock.
    pub fn with_catalog<R>(&self, f: impl FnOnce(&mut ProductCatalog) -> R) -> R {
        let mut catalog = self.catalog.lock().expect("Catalog mutex poisoned");
        f(&mut catalog)
    }

    /// Fetches products for the selected category (all when none) and the
    /// category list.
    ///
    /// On failure the error is recorded on the catalog, an error toast is
    /// shown and the error is returned.
    pub async fn load_catalog(&self) -> SessionResult<usize> {
        let category = self.with_catalog(|catalog| {
            catalog.begin_loading();
            catalog.filters().selected_category.clone()
        });

        let products = async {
            if category.is_empty() {
                self.catalog_source.products().await
            } else {
                self.catalog_source.products_in_category(&category).await
            }
        };
        let (products, categories) = tokio::join!(products, self.catalog_source.categories());

        match products.and_then(|p| categories.map(|c| (p, c))) {
            Ok((products, categories)) => {
                let count = products.len();
                self.with_catalog(|catalog| {
                    catalog.set_products(products);
                    catalog.set_categories(categories);
                });
                info!(count, category = %category, "Catalog loaded");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Failed to load catalog");
                self.with_catalog(|catalog| catalog.fail_loading(e.to_string()));
                self.toasts.error("Failed to load products");
                Err(e)
            }
        }
    }

    /// Evaluates a guard for `full_path` and navigates on redirect.
    pub async fn check_route(&self, guard: RouteGuard, full_path: &str) -> GuardOutcome {
        let outcome = guard.evaluate(
            self.auth.is_authenticated().await,
            full_path,
            self.config.login_path(),
        );

        if let GuardOutcome::Redirect(ref target) = outcome {
            self.navigator.navigate_to(target);
        }
        outcome
    }

    /// Ends the session: pending toasts are dropped.
    pub fn shutdown(&self) {
        self.toasts.clear();
        info!("Storefront session closed");
    }
}
