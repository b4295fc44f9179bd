pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, RegisterRequest};
pub use auth_service_impl::SeaOrmAuthService;

pub mod onboarding_service;
pub mod onboarding_service_impl;
pub use onboarding_service::{Dashboard, OnboardingError, OnboardingService};
pub use onboarding_service_impl::SeaOrmOnboardingService;

pub mod document_service;
pub mod document_service_impl;
pub use document_service::{DocumentError, DocumentService, DocumentUpload, FixMetadataReport};
pub use document_service_impl::SeaOrmDocumentService;
