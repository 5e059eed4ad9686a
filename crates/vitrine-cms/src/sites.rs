//! Sites served by one deployment
//!
//! A request is matched to a site by hostname and port, then by hostname
//! alone, and otherwise falls back to the default site.

use serde::{Deserialize, Serialize};

use crate::references::{PageId, SiteId, WeakRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
	pub id: SiteId,
	pub hostname: String,
	pub port: u16,
	pub site_name: String,
	/// Page served at `/`
	pub root_page: WeakRef<PageId>,
	/// Used when no hostname matches
	pub is_default: bool,
}

impl Site {
	pub fn new(hostname: impl Into<String>, port: u16, site_name: impl Into<String>) -> Self {
		Self {
			id: SiteId::new(),
			hostname: hostname.into(),
			port,
			site_name: site_name.into(),
			root_page: WeakRef::unset(),
			is_default: false,
		}
	}

	pub fn with_root_page(mut self, page: PageId) -> Self {
		self.root_page = WeakRef::to(page);
		self
	}

	pub fn as_default(mut self) -> Self {
		self.is_default = true;
		self
	}

	/// Base URL; the port is omitted when it is the scheme default
	///
	/// ```
	/// use vitrine_cms::sites::Site;
	///
	/// assert_eq!(Site::new("exemple.org", 443, "Asso").root_url(), "https://exemple.org");
	/// assert_eq!(Site::new("localhost", 8000, "Asso").root_url(), "http://localhost:8000");
	/// ```
	pub fn root_url(&self) -> String {
		match self.port {
			80 => format!("http://{}", self.hostname),
			443 => format!("https://{}", self.hostname),
			port => format!("http://{}:{}", self.hostname, port),
		}
	}

	fn hostname_matches(&self, hostname: &str) -> bool {
		self.hostname.eq_ignore_ascii_case(hostname)
	}
}

/// Pick the site serving `hostname` (and `port`, when known)
pub fn match_site<'a, I>(sites: I, hostname: &str, port: Option<u16>) -> Option<&'a Site>
where
	I: IntoIterator<Item = &'a Site>,
{
	let sites: Vec<&Site> = sites.into_iter().collect();
	if let Some(port) = port
		&& let Some(site) = sites
			.iter()
			.copied()
			.find(|s| s.hostname_matches(hostname) && s.port == port)
	{
		return Some(site);
	}
	let mut by_hostname = sites.iter().copied().filter(|s| s.hostname_matches(hostname));
	if let (Some(site), None) = (by_hostname.next(), by_hostname.next()) {
		return Some(site);
	}
	sites.into_iter().find(|s| s.is_default)
}
