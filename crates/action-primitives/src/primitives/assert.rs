//! Assertion primitives
//!
//! Assertions retry until the context deadline, so content that renders a
//! little after the preceding action still passes.

use crate::{
    document::{DocumentPort, ElementHandle},
    errors::ActionError,
    pattern::{normalize_whitespace, TextPattern},
    primitives::{check_ctx, DefaultActionPrimitives},
    types::{ActionReport, ExecCtx},
};
use chrono::Utc;
use std::time::Instant;
use stepwright_core_types::split_pattern_literal;
use tracing::{debug, info};

use super::wait::next_poll;

pub async fn execute_assert_visible(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    debug!(action_id = %ctx.action_id, target = %target.describe(), "assert visible");

    check_ctx(ctx)?;
    loop {
        if target.is_visible().await.unwrap_or(false) {
            return Ok(ActionReport::success(
                started_at,
                start_instant.elapsed().as_millis() as u64,
            ));
        }
        if !next_poll(primitives, ctx).await? {
            return Err(ActionError::AssertionFailed(format!(
                "expected {} to be visible",
                target.describe()
            )));
        }
    }
}

/// Whitespace-normalized equality against the element's text
pub async fn execute_assert_text(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
    expected: &str,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    info!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        expected = %expected,
        "Executing assert_text primitive"
    );

    check_ctx(ctx)?;
    let wanted = normalize_whitespace(expected);
    let mut last_seen = String::new();
    loop {
        match target.text_content().await {
            Ok(text) => {
                let actual = normalize_whitespace(&text);
                if actual == wanted {
                    return Ok(ActionReport::success(
                        started_at,
                        start_instant.elapsed().as_millis() as u64,
                    ));
                }
                last_seen = actual;
            }
            Err(err) => debug!(error = %err, "text not readable yet"),
        }
        if !next_poll(primitives, ctx).await? {
            return Err(ActionError::AssertionFailed(format!(
                "expected text '{}', found '{}'",
                wanted, last_seen
            )));
        }
    }
}

/// Regex search against the element's text
pub async fn execute_assert_match(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
    pattern: &TextPattern,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    info!(
        action_id = %ctx.action_id,
        target = %target.describe(),
        pattern = %pattern,
        "Executing assert_match primitive"
    );

    check_ctx(ctx)?;
    let mut last_seen = String::new();
    loop {
        match target.text_content().await {
            Ok(text) if pattern.is_match(&text) => {
                return Ok(ActionReport::success(
                    started_at,
                    start_instant.elapsed().as_millis() as u64,
                ));
            }
            Ok(text) => last_seen = normalize_whitespace(&text),
            Err(err) => debug!(error = %err, "text not readable yet"),
        }
        if !next_poll(primitives, ctx).await? {
            return Err(ActionError::AssertionFailed(format!(
                "'{}' does not match {}",
                last_seen, pattern
            )));
        }
    }
}

/// Page title check; `/core/` and `/core/i` are matched as patterns
pub async fn execute_assert_title(
    primitives: &DefaultActionPrimitives,
    ctx: &ExecCtx,
    document: &dyn DocumentPort,
    expected: &str,
) -> Result<ActionReport, ActionError> {
    let started_at = Utc::now();
    let start_instant = Instant::now();
    debug!(action_id = %ctx.action_id, expected = %expected, "assert title");

    check_ctx(ctx)?;
    let pattern = if split_pattern_literal(expected).delimited {
        Some(TextPattern::parse(expected)?)
    } else {
        None
    };
    let wanted = normalize_whitespace(expected);
    loop {
        let title = normalize_whitespace(&document.title().await?);
        let ok = match &pattern {
            Some(pattern) => pattern.is_match(&title),
            None => title == wanted,
        };
        if ok {
            return Ok(ActionReport::success(
                started_at,
                start_instant.elapsed().as_millis() as u64,
            ));
        }
        if !next_poll(primitives, ctx).await? {
            return Err(ActionError::AssertionFailed(format!(
                "expected title '{}', found '{}'",
                expected, title
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{ElementFixture, PageFixture, ScriptedDocument, SiteFixture};
    use std::time::Duration;
    use stepwright_core_types::{CandidateDescriptor, LocatorStrategy, WaitKind};
    use tokio_util::sync::CancellationToken;

    fn primitives() -> DefaultActionPrimitives {
        DefaultActionPrimitives::new().with_poll_interval(Duration::from_millis(5))
    }

    async fn banner_page() -> (ScriptedDocument, crate::document::SharedElement) {
        let site = SiteFixture::default().with_page(
            PageFixture::new("https://example.test/", "Example  Home").with_element(
                ElementFixture::new("banner", "h1")
                    .with_id("banner")
                    .with_text("Welcome,\n   Asha"),
            ),
        );
        let document = ScriptedDocument::new(site);
        document
            .navigate("https://example.test/", WaitKind::Load, Duration::from_secs(1))
            .await
            .unwrap();
        let banner = document
            .query(&CandidateDescriptor::value(LocatorStrategy::Id, "banner"))
            .await
            .unwrap()
            .remove(0);
        (document, banner)
    }

    fn ctx(ms: u64) -> ExecCtx {
        ExecCtx::new(1, Duration::from_millis(ms), CancellationToken::new())
    }

    #[tokio::test]
    async fn test_assert_text_normalizes_whitespace() {
        let (_doc, banner) = banner_page().await;
        let report =
            execute_assert_text(&primitives(), &ctx(200), banner.as_ref(), "Welcome, Asha").await;
        assert!(report.is_ok());

        let err = execute_assert_text(&primitives(), &ctx(30), banner.as_ref(), "Goodbye")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::AssertionFailed(_)));
        assert!(err.to_string().contains("Welcome, Asha"));
    }

    #[tokio::test]
    async fn test_assert_match_honors_case_flag() {
        let (_doc, banner) = banner_page().await;
        let insensitive = TextPattern::parse(r"/welcome,\s+\w+/i").unwrap();
        assert!(
            execute_assert_match(&primitives(), &ctx(200), banner.as_ref(), &insensitive)
                .await
                .is_ok()
        );

        let sensitive = TextPattern::parse(r"/welcome/").unwrap();
        assert!(
            execute_assert_match(&primitives(), &ctx(30), banner.as_ref(), &sensitive)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_assert_title_literal_and_pattern() {
        let (doc, _banner) = banner_page().await;
        assert!(execute_assert_title(&primitives(), &ctx(100), &doc, "Example Home")
            .await
            .is_ok());
        assert!(execute_assert_title(&primitives(), &ctx(100), &doc, "/^example/i")
            .await
            .is_ok());
        assert!(execute_assert_title(&primitives(), &ctx(20), &doc, "Other")
            .await
            .is_err());
        // Not a delimited literal, so compared as plain text
        assert!(execute_assert_title(&primitives(), &ctx(20), &doc, "/^example/x")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_cancelled_context_is_refused() {
        let (_doc, banner) = banner_page().await;
        let token = CancellationToken::new();
        token.cancel();
        let ctx = ExecCtx::new(1, Duration::from_secs(1), token);
        assert!(matches!(
            execute_assert_visible(&primitives(), &ctx, banner.as_ref()).await,
            Err(ActionError::Interrupted(_))
        ));
    }
}
