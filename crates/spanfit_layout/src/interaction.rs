//! Tap handling for detected spans
//!
//! Phone numbers become `tel://` URLs; links and anchor tags resolve to
//! their target. A URL is only opened after the opener confirms it can
//! handle it, and failures are logged, never surfaced.

use spanfit_core::DetectedSpan;
use url::Url;

use crate::error::OpenError;

/// Attributes of a custom tag that may carry its target, in priority order
const TARGET_ATTRIBUTES: [&str; 2] = ["href", "url"];

/// Scheme used for dialing detected phone numbers
pub const DIAL_SCHEME: &str = "tel";

/// The URL a tap on `span` should open, if any
///
/// Phone numbers keep their written format; only whitespace is dropped
/// since URL hosts cannot contain it.
pub fn resolve_url(span: &DetectedSpan) -> Result<Option<Url>, OpenError> {
    let raw = match span {
        DetectedSpan::PhoneNumber { number } => {
            let compact: String = number.chars().filter(|c| !c.is_whitespace()).collect();
            format!("{DIAL_SCHEME}://{compact}")
        }
        DetectedSpan::Link { url } => url.clone(),
        DetectedSpan::CustomTag { .. } => {
            match TARGET_ATTRIBUTES.iter().find_map(|key| span.attribute(key)) {
                Some(target) => target.to_string(),
                None => return Ok(None),
            }
        }
        DetectedSpan::Other => return Ok(None),
    };

    Url::parse(&raw)
        .map(Some)
        .map_err(|source| OpenError::InvalidUrl { url: raw, source })
}

/// The host's external-open capability
pub trait UrlOpener {
    /// Whether the platform has a handler for `url`
    fn can_open(&self, url: &Url) -> bool;

    fn open(&self, url: &Url) -> Result<(), OpenError>;
}

/// Opens URLs with the desktop's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    const SCHEMES: [&'static str; 5] = ["http", "https", "mailto", "tel", "file"];
}

impl UrlOpener for SystemOpener {
    fn can_open(&self, url: &Url) -> bool {
        cfg!(any(target_os = "macos", target_os = "linux", target_os = "windows"))
            && Self::SCHEMES.contains(&url.scheme())
    }

    fn open(&self, url: &Url) -> Result<(), OpenError> {
        #[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
        {
            open::that(url.as_str()).map_err(|source| OpenError::Launch {
                url: url.to_string(),
                source,
            })
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            let _ = url;
            Err(OpenError::Unsupported)
        }
    }
}

/// What happened to a tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// The URL was handed to the opener
    Opened(Url),
    /// The opener could not handle the URL
    Declined(Url),
    /// Nothing to open
    Ignored,
}

/// Host callback receiving every tapped span
pub type TapHandler = Box<dyn FnMut(&DetectedSpan)>;

/// Routes taps to the host callback and the opener
pub struct TapDispatcher {
    opener: Box<dyn UrlOpener>,
    handler: Option<TapHandler>,
}

impl TapDispatcher {
    pub fn new(opener: impl UrlOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
            handler: None,
        }
    }

    /// Set the host callback
    pub fn on_tap<F>(&mut self, handler: F)
    where
        F: FnMut(&DetectedSpan) + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    pub fn set_opener(&mut self, opener: impl UrlOpener + 'static) {
        self.opener = Box::new(opener);
    }

    pub fn dispatch(&mut self, span: &DetectedSpan) -> TapOutcome {
        if let Some(handler) = self.handler.as_mut() {
            handler(span);
        }

        let url = match resolve_url(span) {
            Ok(Some(url)) => url,
            Ok(None) => return TapOutcome::Ignored,
            Err(err) => {
                tracing::debug!(%err, "tapped span has no usable URL");
                return TapOutcome::Ignored;
            }
        };

        if !self.opener.can_open(&url) {
            tracing::debug!(%url, "no handler for tapped URL");
            return TapOutcome::Declined(url);
        }
        if let Err(err) = self.opener.open(&url) {
            tracing::warn!(%err, "failed to open tapped URL");
            return TapOutcome::Declined(url);
        }
        TapOutcome::Opened(url)
    }
}

impl Default for TapDispatcher {
    fn default() -> Self {
        Self::new(SystemOpener)
    }
}

impl std::fmt::Debug for TapDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapDispatcher")
            .field("handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}
