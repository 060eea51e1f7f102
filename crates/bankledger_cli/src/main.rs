//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise `bankledger_core` end to end against a throwaway database.
//! - Keep output deterministic for quick local sanity checks.

use bankledger_core::{
    open_db_in_memory, run_in_transaction, Account, BankResult, BankService,
    SqliteAccountRepository,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = open_db_in_memory()?;
    let service = BankService::new(SqliteAccountRepository);

    run_in_transaction(&mut conn, |tx| -> BankResult<()> {
        service.create_account(tx, &Account::new(1001, "alice", 500))?;
        service.create_account(tx, &Account::new(2002, "bob", 100))?;
        service.transfer(tx, 1001, 2002, 200)?;
        Ok(())
    })?;

    for number in [1001, 2002] {
        let account = service.get_account(&conn, number)?;
        println!(
            "account {} ({}) balance={}",
            account.number, account.name, account.balance
        );
    }

    Ok(())
}
