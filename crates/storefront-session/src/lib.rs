//! # storefront-session: Session Collaborators for the Storefront
//!
//! Everything around the pure core that touches the network, the disk or a
//! timer: authentication, toasts, route guards, token persistence, the HTTP
//! data source and configuration.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       storefront-session Modules                        │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   context.rs    │  │    auth.rs      │  │      toast.rs           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Storefront-    │─►│  AuthStore      │  │  ToastStore             │ │
//! │  │  Context        │  │  login/logout   │  │  show/remove/clear      │ │
//! │  │  load_catalog   │  │  init_auth      │  │  tokio timers           │ │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────────────────┘ │
//! │           │                    │                                        │
//! │  ┌────────▼────────┐  ┌────────▼────────┐  ┌─────────────────────────┐ │
//! │  │    api.rs       │  │ token_store.rs  │  │    navigation.rs        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  AuthApi        │  │  TokenStore     │  │  Navigator              │ │
//! │  │  CatalogSource  │  │  File (7 days)  │  │  RouteGuard             │ │
//! │  │  reqwest impl   │  │  Memory         │  │  login_redirect         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  config.rs: StorefrontConfig (TOML + env)   error.rs: SessionError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use storefront_session::{Services, StorefrontConfig, StorefrontContext};
//!
//! # async fn run() -> storefront_session::SessionResult<()> {
//! let config = StorefrontConfig::load_or_default(None);
//! let services = Services::http(&config)?;
//! let ctx = StorefrontContext::new(config, services)?;
//!
//! ctx.auth().init_auth().await;
//! ctx.load_catalog().await?;
//! let visible = ctx.with_catalog(|catalog| catalog.view().items.len());
//! println!("{visible} products on page 1");
//! ctx.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod navigation;
pub mod toast;
pub mod token_store;

pub use api::{AuthApi, AuthResponse, CatalogSource, HttpStorefrontApi, LoginCredentials, User};
pub use auth::{AuthState, AuthStore};
pub use config::StorefrontConfig;
pub use context::{Services, StorefrontContext};
pub use error::{SessionError, SessionResult};
pub use navigation::{GuardOutcome, HistoryNavigator, Navigator, RouteGuard};
pub use toast::{Toast, ToastKind, ToastStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
