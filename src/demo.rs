use crate::io::Snapshot;
use crate::model::{AccountRef, GeneralLedgerType, GroupingRecord};

fn typed(record: GroupingRecord, general_ledger_type: GeneralLedgerType) -> GroupingRecord {
    GroupingRecord {
        general_ledger_type,
        children: record
            .children
            .into_iter()
            .map(|child| typed(child, general_ledger_type))
            .collect(),
        ..record
    }
}

/// A small chart of accounts for `--demo`.
///
/// "Retained Earnings" arrives as a root carrying an entries id and ends up
/// nested under Equity once the tree is built.
pub fn demo_snapshot() -> Snapshot {
    let assets = GroupingRecord::new("assets", "Assets").with_children(vec![
        GroupingRecord::new("current-assets", "Current Assets").with_accounts(vec![
            AccountRef::new("1000", "Cash on Hand"),
            AccountRef::new("1010", "Operating Bank Account"),
        ]),
        GroupingRecord::new("receivables", "Receivables")
            .with_accounts(vec![AccountRef::new("1200", "Trade Debtors")]),
        GroupingRecord::new("fixed-assets", "Fixed Assets").with_children(vec![
            GroupingRecord::new("buildings", "Buildings"),
            GroupingRecord::new("equipment", "Plant & Equipment")
                .with_accounts(vec![AccountRef::new("1510", "Machinery")]),
        ]),
    ]);
    let liabilities = GroupingRecord::new("liabilities", "Liabilities").with_children(vec![
        GroupingRecord::new("payables", "Payables")
            .with_accounts(vec![AccountRef::new("2000", "Trade Creditors")]),
        GroupingRecord::new("tax", "Tax Liabilities"),
    ]);
    let equity = GroupingRecord::new("equity", "Equity")
        .with_accounts(vec![AccountRef::new("3000", "Share Capital")]);
    let retained = GroupingRecord::new("retained-earnings", "Retained Earnings")
        .with_entries_id("equity")
        .with_accounts(vec![AccountRef::new("3100", "Current Year Earnings")]);
    let income = GroupingRecord::new("income", "Income")
        .with_children(vec![GroupingRecord::new("sales", "Sales")
            .with_accounts(vec![AccountRef::new("4000", "Product Sales")])]);
    let expenses = GroupingRecord::new("expenses", "Expenses").with_children(vec![
        GroupingRecord::new("operating", "Operating Expenses"),
        GroupingRecord::new("payroll", "Payroll"),
    ]);

    Snapshot {
        groupings: vec![
            typed(assets, GeneralLedgerType::Assets),
            typed(liabilities, GeneralLedgerType::Liabilities),
            typed(equity, GeneralLedgerType::Equity),
            typed(retained, GeneralLedgerType::Equity),
            typed(income, GeneralLedgerType::Income),
            typed(expenses, GeneralLedgerType::Expenses),
        ],
        accounts: vec![
            AccountRef::new("1020", "Savings Account"),
            AccountRef::new("1300", "Prepayments"),
            AccountRef::new("2100", "Accrued Wages"),
            AccountRef::new("5000", "Rent"),
            AccountRef::new("5100", "Salaries"),
        ],
    }
}
