// Root module of the crawler folder: declares the submodules explicitly
pub mod browser;
pub mod config;
pub mod crawler;
pub mod errors;
pub mod fetcher;
pub mod filter;
pub mod logging;
pub mod prewarmer;
pub mod report;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod test_support;
