mod common;

use rentbook::RentbookError;
use rentbook_core::{NewPerson, OverdueStatus, PageRequest, PaymentFilter, PaymentRequest};
use rentbook_domain::{AdministrativeStatus, BillingPeriod, BsDate, SettlementStatus};
use rust_decimal_macros::dec;

use common::{open_app, setup_app};

fn period(year: i32, month: u32) -> BillingPeriod {
    BillingPeriod::new(year, month).expect("valid period")
}

fn furnished_app() -> (rentbook::RentbookApp, std::path::PathBuf) {
    let (mut app, base) = setup_app();
    let room_id = app.add_room(101, dec!(12000), dec!(500)).expect("add room");
    let on = BsDate::new(2081, 1, 5).expect("valid date");
    app.add_person(NewPerson::new("Sita Sharma", 3, "9800000000").assigned_to(room_id, on))
        .expect("add person");
    (app, base)
}

fn pay(app: &mut rentbook::RentbookApp, month: u32, units: rust_decimal::Decimal, amount: rust_decimal::Decimal) {
    let room_id = app.room_id(101).expect("room");
    app.record_payment(PaymentRequest::new(room_id, period(2081, month), units, amount))
        .expect("record payment");
}

#[test]
fn payments_survive_reopening_the_book() {
    let (mut app, base) = furnished_app();
    pay(&mut app, 1, dec!(40), dec!(13020));
    let stored = app
        .payments(&PaymentFilter::default(), PageRequest::default())
        .items[0]
        .record
        .clone();
    assert_eq!(stored.status, SettlementStatus::Completed);
    assert_eq!(stored.remaining_balance, dec!(0));

    let reopened = open_app(&base);
    assert_eq!(reopened.rooms().len(), 1);
    assert_eq!(reopened.people().len(), 1);
    assert_eq!(reopened.book().payments.len(), 1);
    assert_eq!(reopened.book().payments[0].record, stored);
    assert!(reopened.book().logs.len() >= 3);
}

#[test]
fn current_period_follows_pin_then_latest_payment() {
    let (mut app, base) = furnished_app();
    assert!(matches!(app.as_of(), Err(RentbookError::NoCurrentPeriod)));

    pay(&mut app, 2, dec!(40), dec!(13020));
    assert_eq!(app.as_of().unwrap(), period(2081, 2));

    app.set_as_of(Some(period(2081, 5))).expect("pin period");
    assert_eq!(app.as_of().unwrap(), period(2081, 5));
    assert_eq!(open_app(&base).as_of().unwrap(), period(2081, 5));

    app.set_as_of(None).expect("unpin period");
    assert_eq!(app.as_of().unwrap(), period(2081, 2));
}

#[test]
fn partial_payment_carries_into_the_next_month() {
    let (mut app, _base) = furnished_app();
    app.set_as_of(Some(period(2081, 3))).expect("pin period");
    pay(&mut app, 1, dec!(40), dec!(10000));

    let overdue = app.overdue(101).expect("overdue");
    assert_eq!(overdue.len(), 3);
    assert_eq!(overdue[0].status, OverdueStatus::Partial);
    assert_eq!(overdue[0].remaining_amount, Some(dec!(3020)));
    assert_eq!(overdue[1].status, OverdueStatus::Missing);

    let room_id = app.room_id(101).unwrap();
    let preview = app
        .preview_payment(&PaymentRequest::new(room_id, period(2081, 2), dec!(40), dec!(16040)))
        .expect("preview");
    assert_eq!(preview.record.previous_balance, dec!(3020));
    assert_eq!(preview.record.total_due(), dec!(16040));
    assert_eq!(preview.record.status, SettlementStatus::Completed);
    assert_eq!(app.book().payments.len(), 1);
}

#[test]
fn voiding_a_payment_reopens_the_month() {
    let (mut app, _base) = furnished_app();
    app.set_as_of(Some(period(2081, 2))).expect("pin period");
    pay(&mut app, 1, dec!(40), dec!(13020));
    assert_eq!(app.overdue(101).unwrap().len(), 1);

    let prefix = app.book().payments[0].id.simple().to_string()[..8].to_string();
    app.void_payment(&prefix, AdministrativeStatus::Refunded)
        .expect("void payment");

    let overdue = app.overdue(101).unwrap();
    assert_eq!(overdue.len(), 2);
    assert_eq!(overdue[0].period, period(2081, 1));
    assert!(app
        .void_payment(&prefix, AdministrativeStatus::Failed)
        .is_err());
}

#[test]
fn rejected_commands_leave_the_book_untouched() {
    let (mut app, base) = setup_app();
    let room_id = app.add_room(101, dec!(12000), dec!(500)).unwrap();

    let err = app
        .record_payment(PaymentRequest::new(room_id, period(2081, 1), dec!(10), dec!(100)))
        .unwrap_err();
    assert!(err.to_string().contains("no occupant"));
    assert!(app.add_room(101, dec!(9000), dec!(0)).is_err());

    assert!(app.book().payments.is_empty());
    let reopened = open_app(&base);
    assert_eq!(reopened.rooms().len(), 1);
    assert_eq!(reopened.rooms()[0].rent, dec!(12000));
}

#[test]
fn restoring_a_backup_replaces_the_book() {
    let (mut app, base) = furnished_app();
    let snapshot = app.backup(Some("before second room")).expect("backup");
    app.add_room(102, dec!(9000), dec!(300)).unwrap();
    assert_eq!(app.rooms().len(), 2);

    let restored = app.restore(&snapshot.id).expect("restore");
    assert_eq!(restored.id, snapshot.id);
    assert_eq!(app.rooms().len(), 1);
    assert_eq!(open_app(&base).rooms().len(), 1);
}

#[test]
fn income_series_cover_the_whole_year() {
    let (mut app, _base) = furnished_app();
    pay(&mut app, 1, dec!(40), dec!(13020));
    pay(&mut app, 2, dec!(20), dec!(12760));

    let (monthly, cumulative) = app.income(2081).expect("income");
    assert_eq!(monthly.len(), 12);
    assert_eq!(monthly[1].rent, dec!(12000));
    assert_eq!(cumulative[11].rent, dec!(24000));
    assert_eq!(cumulative[11].collected, dec!(25780));
}
