use action_primitives::{
    ActionError, ActionPrimitives, ActionReport, DocumentPort, ElementHandle, ExecCtx,
    TextPattern,
};
use stepwright_core_types::{ActionKind, Step};

use crate::policy::EnginePolicyView;

/// Perform exactly one action. `target` is the resolved element for every
/// action that needs one.
pub(crate) async fn dispatch_action(
    primitives: &dyn ActionPrimitives,
    policy: &EnginePolicyView,
    ctx: &ExecCtx,
    document: &dyn DocumentPort,
    step: &Step,
    target: Option<&dyn ElementHandle>,
) -> Result<ActionReport, ActionError> {
    let element = || {
        target.ok_or_else(|| ActionError::Internal(format!("{} has no resolved target", step.action)))
    };
    let input = || payload(step.input.as_deref(), "input");

    let report = match step.action {
        ActionKind::Click => primitives.click(ctx, element()?).await?,
        ActionKind::PressSequentially | ActionKind::Fill => {
            primitives.type_text(ctx, element()?, input()?).await?
        }
        ActionKind::Press => primitives.press_key(ctx, element()?, input()?).await?,
        ActionKind::Select => {
            primitives
                .select(ctx, element()?, step.input.as_deref())
                .await?
        }
        ActionKind::Check => primitives.set_checked(ctx, element()?, true).await?,
        ActionKind::Uncheck => primitives.set_checked(ctx, element()?, false).await?,
        ActionKind::Hover => primitives.hover(ctx, element()?).await?,
        ActionKind::Scroll => primitives.scroll(ctx, element()?).await?,
        ActionKind::WaitFor => primitives.wait_visible(ctx, element()?).await?,
        ActionKind::AssertVisible => primitives.assert_visible(ctx, element()?).await?,
        ActionKind::AssertText => {
            let expected = payload(step.expected_text.as_deref(), "expectedText")?;
            let report = primitives.assert_text(ctx, element()?, expected).await?;
            also_visible(primitives, policy, ctx, element()?).await?;
            report
        }
        ActionKind::AssertMatch => {
            let pattern = TextPattern::parse(payload(step.pattern.as_deref(), "pattern")?)?;
            let report = primitives.assert_match(ctx, element()?, &pattern).await?;
            also_visible(primitives, policy, ctx, element()?).await?;
            report
        }
        ActionKind::AssertTitle => primitives.assert_title(ctx, document, input()?).await?,
        ActionKind::Custom => return Err(unhandled_custom(step)),
        ActionKind::Navigate => {
            return Err(ActionError::Internal(
                "navigate is not dispatched against an element".to_string(),
            ))
        }
    };
    Ok(report)
}

async fn also_visible(
    primitives: &dyn ActionPrimitives,
    policy: &EnginePolicyView,
    ctx: &ExecCtx,
    target: &dyn ElementHandle,
) -> Result<(), ActionError> {
    if policy.assertion_also_check_visible {
        primitives.assert_visible(ctx, target).await?;
    }
    Ok(())
}

fn payload<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ActionError> {
    value.ok_or_else(|| ActionError::Internal(format!("missing `{}` after validation", field)))
}

/// Custom actions have no primitive behind them
pub(crate) fn unhandled_custom(step: &Step) -> ActionError {
    ActionError::Unsupported(format!("custom action '{}' has no handler", step.intent))
}
