// Copyright 2025 Alexandre D. Díaz
pub mod user;

use crate::error::Result;
use crate::gateway::Gateway;

pub fn prepare_schema(gateway: &Gateway) -> Result<()> {
    user::create_table(gateway)?;
    Ok(())
}
