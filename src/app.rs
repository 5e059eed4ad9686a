//! Application wiring
//!
//! [`Application`] owns the content store, the footer settings registry, the
//! mail backend and the admin registry, built from [`Settings`].

use std::sync::Arc;
use vitrine_cms::admin::AdminPageRegistry;
use vitrine_cms::contact::ContactFormService;
use vitrine_cms::error::CmsError;
use vitrine_cms::pages::{AboutPage, ContactPage, FormationsPage, HomePage};
use vitrine_cms::references::{ImageId, PageId, SiteId, WeakRef};
use vitrine_cms::site_settings::{FooterSettings, SiteSettingsRegistry};
use vitrine_cms::sites::Site;
use vitrine_cms::store::ContentStore;
use vitrine_conf::Settings;
use vitrine_forms::{FieldType, FormFieldDefinition};
use vitrine_mail::validation::validate_email;
use vitrine_mail::{EmailBackend, backend_from_settings};

use crate::{AppError, AppResult};

/// Pages and site created by [`Application::seed_default_site`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSite {
	pub site: SiteId,
	pub home: PageId,
	pub formations: PageId,
	pub about: PageId,
	pub contact: PageId,
}

pub struct Application {
	settings: Settings,
	store: Arc<ContentStore>,
	footers: Arc<SiteSettingsRegistry<FooterSettings>>,
	mailer: Arc<dyn EmailBackend>,
	admin: AdminPageRegistry,
}

impl Application {
	/// Validate `settings` and build the application with the mail backend
	/// they name
	pub fn from_settings(settings: Settings) -> AppResult<Self> {
		settings.validate()?;
		let mailer = backend_from_settings(&settings.email)?;
		Self::with_mailer(settings, mailer)
	}

	/// Build the application around an existing mail backend
	///
	/// The default sender must be an address the mail layer accepts, since
	/// seeded contact pages send from it.
	pub fn with_mailer(settings: Settings, mailer: Arc<dyn EmailBackend>) -> AppResult<Self> {
		validate_email(&settings.email.default_from_email)?;
		let admin = AdminPageRegistry::with_default_page_types()?;
		tracing::info!(
			site = %settings.site.site_name,
			mail_backend = %settings.email.backend,
			dispatch = ?settings.email.dispatch,
			"application configured"
		);
		Ok(Self {
			settings,
			store: Arc::new(ContentStore::new()),
			footers: Arc::new(SiteSettingsRegistry::new()),
			mailer,
			admin,
		})
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn store(&self) -> &Arc<ContentStore> {
		&self.store
	}

	pub fn admin(&self) -> &AdminPageRegistry {
		&self.admin
	}

	/// Contact form service using the configured backend and dispatch mode
	pub fn contact_forms(&self) -> ContactFormService {
		ContactFormService::new(Arc::clone(&self.store), Arc::clone(&self.mailer))
			.with_dispatch(self.settings.email.dispatch)
	}

	/// First-run content: a live home page with formations, about and
	/// contact children, a starter contact form and the default site
	pub fn seed_default_site(&self) -> AppResult<SeededSite> {
		let store = &self.store;
		let home = store.create_page(None, HomePage::new("Accueil"))?;
		let formations = store.create_page(Some(home), FormationsPage::new("Nos formations"))?;
		let about = store.create_page(Some(home), AboutPage::new("À propos"))?;

		let mut contact_page = ContactPage::new("Contact");
		contact_page.from_address = self.settings.email.default_from_email.clone();
		let contact = store.create_page(Some(home), contact_page)?;
		store.set_form_fields(contact, starter_form())?;

		let mut home_page: HomePage = store.page(home)?;
		home_page.hero_primary_button_page = WeakRef::to(about);
		home_page.hero_secondary_button_page = WeakRef::to(contact);
		store.save_page(&home_page)?;

		for page in [home, formations, about, contact] {
			store.publish(page)?;
		}

		let config = &self.settings.site;
		let site = store.add_site(
			Site::new(&config.hostname, config.port, &config.site_name)
				.with_root_page(home)
				.as_default(),
		)?;
		self.footers.for_site(site);

		tracing::info!(site = %site, home = %home, "default site seeded");
		Ok(SeededSite {
			site,
			home,
			formations,
			about,
			contact,
		})
	}

	/// Delete an image and unset every page field and footer logo using it
	pub fn delete_image(&self, image: ImageId) -> AppResult<usize> {
		let cleared = self.store.delete_image(image)? + self.footers.clear_image(image);
		Ok(cleared)
	}

	/// Delete a site together with its footer settings
	pub fn delete_site(&self, site: SiteId) -> AppResult<Site> {
		let removed = self.store.delete_site(site)?;
		self.footers.remove_site(site);
		Ok(removed)
	}

	/// Footer settings of a stored site
	pub fn footer(&self, site: SiteId) -> AppResult<FooterSettings> {
		self.require_site(site)?;
		Ok(self.footers.for_site(site))
	}

	/// Validate and store the footer settings of a stored site
	///
	/// A logo that is no longer stored is unset.
	pub fn update_footer(&self, site: SiteId, mut footer: FooterSettings) -> AppResult<()> {
		self.require_site(site)?;
		if footer.logo.resolve(self.store.as_ref()).is_none() {
			footer.logo.clear();
		}
		self.footers.update(site, footer)?;
		Ok(())
	}

	fn require_site(&self, site: SiteId) -> AppResult<Site> {
		self.store
			.site(site)
			.ok_or_else(|| AppError::Cms(CmsError::SiteNotFound(site.to_string())))
	}

	/// Footer of the site serving `hostname`
	pub fn footer_for_host(&self, hostname: &str, port: Option<u16>) -> Option<FooterSettings> {
		self.store
			.find_site(hostname, port)
			.map(|site| self.footers.for_site(site.id))
	}
}

fn starter_form() -> Vec<FormFieldDefinition> {
	vec![
		FormFieldDefinition::new("Nom", FieldType::SingleLine).with_help_text("Votre nom"),
		FormFieldDefinition::new("Email", FieldType::Email).with_help_text("vous@exemple.com"),
		FormFieldDefinition::new("Message", FieldType::MultiLine)
			.with_help_text("Votre message"),
	]
}
