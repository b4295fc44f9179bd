pub use super::document_types::Entity as DocumentTypes;
pub use super::documents::Entity as Documents;
pub use super::onboarding_progress::Entity as OnboardingProgress;
pub use super::personal_details::Entity as PersonalDetails;
pub use super::users::Entity as Users;
