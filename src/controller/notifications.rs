use std::time::Duration;

use tokio::time::Instant;

use crate::config::{ERROR_BANNER_TTL, SUCCESS_BANNER_TTL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
    /// Stays until dismissed or replaced.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub shown_at: Instant,
    pub expires_at: Option<Instant>,
}

impl Banner {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// One slot per banner kind; showing a banner replaces the slot's text and
/// restarts its timer.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    error: Option<Banner>,
    success: Option<Banner>,
    warning: Option<Banner>,
}

impl NotificationCenter {
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(Self::banner(BannerKind::Error, message, Some(ERROR_BANNER_TTL)));
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.success = Some(Self::banner(BannerKind::Success, message, Some(SUCCESS_BANNER_TTL)));
    }

    pub fn show_warning(&mut self, message: impl Into<String>) {
        self.warning = Some(Self::banner(BannerKind::Warning, message, None));
    }

    fn banner(kind: BannerKind, message: impl Into<String>, ttl: Option<Duration>) -> Banner {
        let now = Instant::now();
        Banner {
            kind,
            message: message.into(),
            shown_at: now,
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    pub fn dismiss(&mut self, kind: BannerKind) {
        *self.slot_mut(kind) = None;
    }

    /// Drops every banner whose timer ran out by `now`.
    pub fn prune(&mut self, now: Instant) {
        for kind in [BannerKind::Error, BannerKind::Success, BannerKind::Warning] {
            let slot = self.slot_mut(kind);
            if slot.as_ref().is_some_and(|b| !b.is_visible_at(now)) {
                *slot = None;
            }
        }
    }

    pub fn get(&self, kind: BannerKind) -> Option<&Banner> {
        match kind {
            BannerKind::Error => self.error.as_ref(),
            BannerKind::Success => self.success.as_ref(),
            BannerKind::Warning => self.warning.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.get(BannerKind::Error).map(|b| b.message.as_str())
    }

    pub fn success(&self) -> Option<&str> {
        self.get(BannerKind::Success).map(|b| b.message.as_str())
    }

    pub fn warning(&self) -> Option<&str> {
        self.get(BannerKind::Warning).map(|b| b.message.as_str())
    }

    pub fn visible(&self, now: Instant) -> Vec<&Banner> {
        [&self.warning, &self.error, &self.success]
            .into_iter()
            .flatten()
            .filter(|b| b.is_visible_at(now))
            .collect()
    }

    fn slot_mut(&mut self, kind: BannerKind) -> &mut Option<Banner> {
        match kind {
            BannerKind::Error => &mut self.error,
            BannerKind::Success => &mut self.success,
            BannerKind::Warning => &mut self.warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn error_banner_hides_after_five_seconds() {
        let mut center = NotificationCenter::default();
        center.show_error("boom");

        tokio::time::advance(Duration::from_millis(4999)).await;
        center.prune(Instant::now());
        assert_eq!(center.error(), Some("boom"));

        tokio::time::advance(Duration::from_millis(1)).await;
        center.prune(Instant::now());
        assert_eq!(center.error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn success_banner_hides_after_three_seconds() {
        let mut center = NotificationCenter::default();
        center.show_success("ok");
        center.show_error("still here");

        tokio::time::advance(Duration::from_secs(3)).await;
        center.prune(Instant::now());
        assert_eq!(center.success(), None);
        assert_eq!(center.error(), Some("still here"));
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_a_banner_restarts_its_timer() {
        let mut center = NotificationCenter::default();
        center.show_error("first");
        tokio::time::advance(Duration::from_secs(4)).await;
        center.show_error("second");
        tokio::time::advance(Duration::from_secs(4)).await;

        center.prune(Instant::now());
        assert_eq!(center.error(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn warning_persists_until_dismissed() {
        let mut center = NotificationCenter::default();
        center.show_warning("offline");
        tokio::time::advance(Duration::from_secs(3600)).await;
        center.prune(Instant::now());
        assert_eq!(center.visible(Instant::now()).len(), 1);

        center.dismiss(BannerKind::Warning);
        assert_eq!(center.warning(), None);
    }
}
