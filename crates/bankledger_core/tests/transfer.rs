use bankledger_core::db::open_db_in_memory;
use bankledger_core::db::DbResult;
use bankledger_core::{
    run_in_transaction, Account, AccountNumber, AccountRepository, BankError, BankResult,
    BankService, SqliteAccountRepository, TransferLeg,
};
use rusqlite::Connection;

fn seeded_connection() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let service = BankService::new(SqliteAccountRepository);
    service
        .create_account(&conn, &Account::new(1001, "alice", 500))
        .unwrap();
    service
        .create_account(&conn, &Account::new(2002, "bob", 100))
        .unwrap();
    conn
}

fn balance(conn: &Connection, number: AccountNumber) -> i64 {
    BankService::new(SqliteAccountRepository)
        .get_account(conn, number)
        .unwrap()
        .balance
}

#[test]
fn transfer_moves_funds_and_conserves_total() {
    let mut conn = seeded_connection();
    let service = BankService::new(SqliteAccountRepository);

    run_in_transaction(&mut conn, |tx| service.transfer(tx, 1001, 2002, 200)).unwrap();

    assert_eq!(balance(&conn, 1001), 300);
    assert_eq!(balance(&conn, 2002), 300);
}

#[test]
fn transfer_over_balance_fails_and_leaves_both_untouched() {
    let mut conn = seeded_connection();
    let service = BankService::new(SqliteAccountRepository);

    let err =
        run_in_transaction(&mut conn, |tx| service.transfer(tx, 1001, 2002, 600)).unwrap_err();
    assert!(matches!(err, BankError::BalanceNotEnough(1001)));

    assert_eq!(balance(&conn, 1001), 500);
    assert_eq!(balance(&conn, 2002), 100);
}

#[test]
fn transfer_non_positive_amount_fails_eligibility() {
    let mut conn = seeded_connection();
    let service = BankService::new(SqliteAccountRepository);

    let err = run_in_transaction(&mut conn, |tx| service.transfer(tx, 1001, 2002, 0)).unwrap_err();
    assert!(matches!(err, BankError::BalanceNotEnough(1001)));

    assert_eq!(balance(&conn, 1001), 500);
    assert_eq!(balance(&conn, 2002), 100);
}

#[test]
fn transfer_from_missing_account_fails_without_mutation() {
    let mut conn = seeded_connection();
    let service = BankService::new(SqliteAccountRepository);

    let err =
        run_in_transaction(&mut conn, |tx| service.transfer(tx, 9999, 2002, 50)).unwrap_err();
    assert!(matches!(err, BankError::AccountNotFound(9999)));
    assert_eq!(balance(&conn, 2002), 100);
}

#[test]
fn transfer_to_missing_account_fails_without_mutation() {
    let mut conn = seeded_connection();
    let service = BankService::new(SqliteAccountRepository);

    let err =
        run_in_transaction(&mut conn, |tx| service.transfer(tx, 1001, 9999, 50)).unwrap_err();
    assert!(matches!(err, BankError::AccountNotFound(9999)));
    assert_eq!(balance(&conn, 1001), 500);
}

/// Delegating double whose deposit leg reports zero rows affected, simulating
/// the destination row vanishing between the eligibility check and the second
/// update statement.
struct VanishingDepositRepo(SqliteAccountRepository);

impl AccountRepository for VanishingDepositRepo {
    fn find_by_number(
        &self,
        conn: &Connection,
        number: AccountNumber,
    ) -> DbResult<Option<Account>> {
        self.0.find_by_number(conn, number)
    }

    fn save(&self, conn: &Connection, account: &Account) -> DbResult<usize> {
        self.0.save(conn, account)
    }

    fn count_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<i64> {
        self.0.count_by_number(conn, number)
    }

    fn deposit(&self, _conn: &Connection, _number: AccountNumber, _amount: i64) -> DbResult<usize> {
        Ok(0)
    }

    fn withdraw(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize> {
        self.0.withdraw(conn, number, amount)
    }

    fn delete_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<usize> {
        self.0.delete_by_number(conn, number)
    }
}

#[test]
fn failed_deposit_leg_rolls_back_the_withdraw_leg() {
    let mut conn = seeded_connection();
    let service = BankService::new(VanishingDepositRepo(SqliteAccountRepository));

    let err = run_in_transaction(&mut conn, |tx| -> BankResult<()> {
        service.transfer(tx, 1001, 2002, 200)
    })
    .unwrap_err();
    assert!(matches!(
        &err,
        BankError::TransferIntegrity {
            account: 2002,
            leg: TransferLeg::Deposit,
        }
    ));
    assert!(!err.is_business());

    // Atomicity: the already-applied withdraw leg must not survive.
    assert_eq!(balance(&conn, 1001), 500);
    assert_eq!(balance(&conn, 2002), 100);
}

/// Delegating double whose delete reports zero rows affected, simulating a
/// concurrent deleter winning between the existence probe and the delete.
struct VanishingDeleteRepo(SqliteAccountRepository);

impl AccountRepository for VanishingDeleteRepo {
    fn find_by_number(
        &self,
        conn: &Connection,
        number: AccountNumber,
    ) -> DbResult<Option<Account>> {
        self.0.find_by_number(conn, number)
    }

    fn save(&self, conn: &Connection, account: &Account) -> DbResult<usize> {
        self.0.save(conn, account)
    }

    fn count_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<i64> {
        self.0.count_by_number(conn, number)
    }

    fn deposit(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize> {
        self.0.deposit(conn, number, amount)
    }

    fn withdraw(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize> {
        self.0.withdraw(conn, number, amount)
    }

    fn delete_by_number(&self, _conn: &Connection, _number: AccountNumber) -> DbResult<usize> {
        Ok(0)
    }
}

#[test]
fn zero_row_delete_after_existence_check_is_an_integrity_error() {
    let conn = seeded_connection();
    let service = BankService::new(VanishingDeleteRepo(SqliteAccountRepository));

    let err = service.drop_account(&conn, 1001).unwrap_err();
    assert!(matches!(&err, BankError::DeleteIntegrity(1001)));
    assert!(!err.is_business());
}
