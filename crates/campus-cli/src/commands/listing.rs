use super::CommandContext;
use anyhow::Result;
use campus_access::models::UserId;
use campus_access::{Capabilities, PermissionsTable};

pub async fn list_modules(ctx: &CommandContext, user: UserId) -> Result<()> {
    let modules = ctx.access.resolver().accessible_modules(user).await?;

    println!("Modules for user {}", user);
    println!("==================");

    if modules.is_empty() {
        println!("No modules found");
        return Ok(());
    }

    for table in &modules {
        println!(
            "{:<10} course {:<4} {:<20} {}",
            table.module_code.as_deref().unwrap_or("-"),
            table.course_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            table.role_name,
            flags(table)
        );
    }

    Ok(())
}

pub async fn list_courses(ctx: &CommandContext, user: UserId) -> Result<()> {
    let courses = ctx.access.resolver().accessible_courses(user).await?;

    println!("Courses for user {}", user);
    println!("==================");

    if courses.is_empty() {
        println!("No courses found");
        return Ok(());
    }

    for course in &courses {
        println!("{:<4} {:<30} {:<20} {}", course.course_id, course.title, course.permissions.role_name, flags(&course.permissions));
    }

    Ok(())
}

/// `RWUD`-style summary, `A` when the table carries the admin override
fn flags(table: &PermissionsTable) -> String {
    if table.admin {
        return "A".to_string();
    }

    let Capabilities { read, write, delete, update } = table.capabilities;
    [(read, 'R'), (write, 'W'), (update, 'U'), (delete, 'D')]
        .iter()
        .map(|(granted, flag)| if *granted { *flag } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut table = PermissionsTable::synthesized(false, "admin");
        assert_eq!(flags(&table), "----");

        table.capabilities = Capabilities::READ_ONLY;
        assert_eq!(flags(&table), "R---");

        table.admin = true;
        assert_eq!(flags(&table), "A");
    }
}
