/// Basis points in a whole (10000bp = 100%)
pub const BASIS_POINT_SCALE: i64 = 10_000;

/// Default fund accent color
pub const DEFAULT_FUND_COLOR: &str = "#06b6d4";

/// Default fund icon
pub const DEFAULT_FUND_ICON: &str = "💰";

/// Payee recorded on allocation-generated transactions
pub const ALLOCATION_PAYEE: &str = "Monthly Allocation";

/// Tag applied to allocation-generated transactions
pub const ALLOCATION_TAG: &str = "allocation";

/// Tag applied to both legs of a transfer
pub const TRANSFER_TAG: &str = "transfer";

/// First page number for paginated listings
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for audit log listings
pub const DEFAULT_PAGE_SIZE: i64 = 50;
