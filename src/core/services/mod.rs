pub mod entry_service;
pub mod export_service;
pub mod ledger_service;
pub mod summary_service;

pub use entry_service::EntryService;
pub use export_service::ExportService;
pub use ledger_service::{LedgerService, OrphanedGroup};
pub use summary_service::{
    AccountBalance, Band, BandThresholds, BudgetComparisonRow, CategoryTotal, DashboardSummary,
    SubcategoryTotal, SummaryService, Totals,
};
