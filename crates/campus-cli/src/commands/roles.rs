use super::CommandContext;
use anyhow::Result;

pub async fn show_role(ctx: &CommandContext, name: &str) -> Result<()> {
    match ctx.access.roles().find_role_by_name(name).await? {
        Some(role) => {
            println!("Role: {} (id {})", role.name, role.id);
            println!("  Description: {}", role.description);
            println!("  Read: {}", role.can_read);
            println!("  Write: {}", role.can_write);
            println!("  Update: {}", role.can_update);
            println!("  Delete: {}", role.can_delete);
        }
        None => println!("Role '{}' not found", name),
    }

    Ok(())
}
