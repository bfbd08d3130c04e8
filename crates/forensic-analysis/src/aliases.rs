//! Label variants providers use for the line items the estimators read.

use analysis_core::AliasList;

pub const OPERATING_INCOME: AliasList =
    AliasList::new("operating income", &["Operating Income", "OperatingIncome", "EBIT"]);

pub const RESTRUCTURING: AliasList = AliasList::new(
    "restructuring",
    &[
        "Restructuring And Mergern Acquisition",
        "RestructuringCharges",
        "Restructuring",
        "Merger And Acquisition Expense",
    ],
);

pub const UNUSUAL_ITEMS: AliasList = AliasList::new(
    "unusual items",
    &[
        "Other Special Charges",
        "OtherUnusualItems",
        "Special Income Charges",
        "Write Off",
        "Impairment Of Capital Assets",
        "Asset Impairment Charge",
    ],
);

pub const NET_INCOME: AliasList = AliasList::new(
    "net income",
    &["Net Income", "NetIncome", "Net Income Common Stockholders"],
);

pub const OPERATING_CASH_FLOW: AliasList = AliasList::new(
    "operating cash flow",
    &[
        "Operating Cash Flow",
        "Total Cash From Operating Activities",
        "OperatingCashFlow",
    ],
);

pub const TOTAL_ASSETS: AliasList = AliasList::new("total assets", &["Total Assets", "TotalAssets"]);
