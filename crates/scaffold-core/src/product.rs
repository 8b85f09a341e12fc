//! Product configuration trait for CLI binaries
//!
//! Each product binary implements this trait to name itself, its template
//! repository, its environment overrides and its documentation. The library
//! never reads product-specific constants directly.

/// Configuration trait for scaffolding CLI products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for env vars, user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable overriding the template download URL
    fn template_url_env(&self) -> &'static str;

    /// Environment variable naming a package manager, overriding detection
    fn manager_name_env(&self) -> &'static str;

    /// Environment variable paired with [`Self::manager_name_env`] carrying
    /// the manager's version
    fn manager_version_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
