use super::{CommandContext, print_json};
use crate::ModuleTarget;
use anyhow::{Result, anyhow};
use campus_access::PermissionsTable;
use campus_access::models::{CourseId, UserId};

pub async fn resolve_module(ctx: &CommandContext, user: UserId, target: &ModuleTarget) -> Result<()> {
    let module = target.identifier().ok_or_else(|| anyhow!("Either --module-id or --code is required"))?;
    let table = ctx.access.resolver().resolve_for_module(user, &module).await?;
    print_json(&table)
}

pub async fn resolve_course(ctx: &CommandContext, user: UserId, course: CourseId) -> Result<()> {
    let table: PermissionsTable = ctx.access.resolver().resolve_for_course(user, course).await?;
    print_json(&table)
}
