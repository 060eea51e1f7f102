use bankledger_core::Account;

#[test]
fn new_sets_all_fields() {
    let account = Account::new(1001, "alice", 500);

    assert_eq!(account.number, 1001);
    assert_eq!(account.name, "alice");
    assert_eq!(account.balance, 500);
}

#[test]
fn can_withdraw_requires_positive_amount_within_balance() {
    let account = Account::new(1001, "alice", 500);

    assert!(account.can_withdraw(1));
    assert!(account.can_withdraw(500));
    assert!(!account.can_withdraw(501));
    assert!(!account.can_withdraw(0));
    assert!(!account.can_withdraw(-5));
}

#[test]
fn can_withdraw_is_false_on_empty_balance() {
    let account = Account::new(2002, "bob", 0);

    assert!(!account.can_withdraw(1));
}

#[test]
fn serialization_uses_storage_field_names() {
    let account = Account::new(1001, "alice", 500);

    let json = serde_json::to_value(&account).unwrap();
    assert_eq!(json["account_number"], 1001);
    assert_eq!(json["name"], "alice");
    assert_eq!(json["balance"], 500);

    let decoded: Account = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, account);
}
