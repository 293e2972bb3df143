// Copyright 2025 Alexandre D. Díaz
use std::sync::Arc;

use recordstore::RecordMapper;
use sessiontoken::TokenService;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub mapper: RecordMapper,
    pub tokens: Arc<TokenService>,
}
