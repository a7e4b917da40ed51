//! Black-box tests over the full estimate → job → invoice → payment flow.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use buildledger_core::{DomainError, Money, Quantity};
use buildledger_jobs::{EstimateStatus, JobStatus, NewEstimate, NewMaterial};
use buildledger_lifecycle::LifecycleService;
use buildledger_parties::{NewCustomer, NewProperty};
use buildledger_store::InMemoryStore;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

fn money(d: Decimal) -> Money {
    Money::new(d).unwrap()
}

fn qty(d: Decimal) -> Quantity {
    Quantity::new(d).unwrap()
}

struct Fixture {
    store: Arc<InMemoryStore>,
    service: LifecycleService,
}

impl Fixture {
    fn new() -> Self {
        buildledger_observability::init();
        let store = Arc::new(InMemoryStore::new());
        let service = LifecycleService::new(Arc::clone(&store));
        Self { store, service }
    }

    fn customer(&self) -> buildledger_parties::Customer {
        self.store
            .create_customer(NewCustomer {
                first_name: "Grace".to_string(),
                last_name: "Njeri".to_string(),
                email: "grace@example.com".to_string(),
                phone: "+254733000000".to_string(),
                address: "Karen Lane".to_string(),
                account: None,
            })
            .unwrap()
    }

    fn estimate_for(
        &self,
        customer_id: buildledger_core::CustomerId,
        total_cost: Decimal,
    ) -> buildledger_jobs::Estimate {
        self.service
            .create_estimate(NewEstimate {
                customer_id,
                property_id: None,
                visit_date: day(3, 1),
                initial_outline: "Boundary wall and gate".to_string(),
                detailed_estimate: "Stone wall, steel gate".to_string(),
                total_cost: money(total_cost),
            })
            .unwrap()
    }

    fn cement(&self, unit_price: Decimal) -> buildledger_jobs::Material {
        self.store
            .create_material(NewMaterial {
                name: "Cement".to_string(),
                unit_price: money(unit_price),
                unit: "bag".to_string(),
                supplier: "Bamburi".to_string(),
            })
            .unwrap()
    }
}

#[test]
fn full_flow_from_estimate_to_paid_invoice() {
    let fx = Fixture::new();
    let customer = fx.customer();

    let estimate = fx.estimate_for(customer.id_typed(), dec!(50000.00));
    assert_eq!(estimate.status(), EstimateStatus::Pending);

    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 5))
        .unwrap();

    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 10), day(3, 8))
        .unwrap();
    assert_eq!(job.status(), JobStatus::Scheduled);

    fx.service.start_job(job.id_typed()).unwrap();

    let material = fx.cement(dec!(25.00));
    fx.service
        .add_job_material(job.id_typed(), material.id_typed(), qty(dec!(10)))
        .unwrap();

    let job = fx.service.complete_job(job.id_typed(), day(3, 20)).unwrap();
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.actual_cost(), Some(money(dec!(250.00))));
    assert_eq!(job.end_date(), Some(day(3, 20)));

    let invoice = fx
        .service
        .issue_invoice(job.id_typed(), day(3, 21))
        .unwrap();
    assert_eq!(invoice.amount(), money(dec!(250.00)));
    assert_eq!(invoice.due_date(), day(4, 20));
    assert!(!invoice.is_paid());

    let (_, invoice) = fx
        .service
        .record_payment(
            invoice.id_typed(),
            money(dec!(250.00)),
            "mpesa".to_string(),
            Some("QX12".to_string()),
            day(3, 25),
        )
        .unwrap();
    assert!(invoice.is_paid());
    assert_eq!(invoice.paid_date(), Some(day(3, 25)));
}

#[test]
fn invoice_amount_uses_line_snapshots_not_current_catalog_prices() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let estimate = fx.estimate_for(customer.id_typed(), dec!(1000.00));
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();
    fx.service.start_job(job.id_typed()).unwrap();

    let material = fx.cement(dec!(25.00));
    fx.service
        .add_job_material(job.id_typed(), material.id_typed(), qty(dec!(10)))
        .unwrap();

    // Catalog price changes after the line was created.
    fx.store
        .set_material_price(material.id_typed(), money(dec!(40.00)))
        .unwrap();

    let job = fx.service.complete_job(job.id_typed(), day(3, 9)).unwrap();
    assert_eq!(job.actual_cost(), Some(money(dec!(250.00))));

    let invoice = fx.service.issue_invoice(job.id_typed(), day(3, 10)).unwrap();
    assert_eq!(invoice.amount(), money(dec!(250.00)));
}

#[test]
fn partial_payments_flip_paid_only_at_full_amount() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let estimate = fx.estimate_for(customer.id_typed(), dec!(100.00));
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();
    let material = fx.cement(dec!(100.00));
    fx.service
        .add_job_material(job.id_typed(), material.id_typed(), qty(dec!(1)))
        .unwrap();
    fx.service.complete_job(job.id_typed(), day(3, 9)).unwrap();
    let invoice = fx.service.issue_invoice(job.id_typed(), day(3, 10)).unwrap();
    assert_eq!(invoice.amount(), money(dec!(100.00)));

    let (_, invoice) = fx
        .service
        .record_payment(
            invoice.id_typed(),
            money(dec!(60.00)),
            "cash".to_string(),
            None,
            day(3, 12),
        )
        .unwrap();
    assert!(!invoice.is_paid());

    let (_, invoice) = fx
        .service
        .record_payment(
            invoice.id_typed(),
            money(dec!(40.00)),
            "cash".to_string(),
            None,
            day(3, 15),
        )
        .unwrap();
    assert!(invoice.is_paid());
    assert_eq!(invoice.paid_date(), Some(day(3, 15)));
}

#[test]
fn schedule_job_requires_accepted_estimate() {
    let fx = Fixture::new();
    let customer = fx.customer();

    // Pending.
    let pending = fx.estimate_for(customer.id_typed(), dec!(10.00));
    // Sent.
    let sent = fx.estimate_for(customer.id_typed(), dec!(10.00));
    fx.service.send_estimate(sent.id_typed(), day(3, 2)).unwrap();
    // Rejected.
    let rejected = fx.estimate_for(customer.id_typed(), dec!(10.00));
    fx.service.reject_estimate(rejected.id_typed()).unwrap();

    for estimate_id in [pending.id_typed(), sent.id_typed(), rejected.id_typed()] {
        let err = fx
            .service
            .schedule_job(estimate_id, day(3, 10), day(3, 8))
            .unwrap_err();
        assert!(
            matches!(err, DomainError::InvalidTransition(_)),
            "expected InvalidTransition for {estimate_id}, got {err:?}"
        );
    }
}

#[test]
fn invoice_requires_completed_job() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let estimate = fx.estimate_for(customer.id_typed(), dec!(10.00));
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();

    let err = fx
        .service
        .issue_invoice(job.id_typed(), day(3, 6))
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition(_)));
}

#[test]
fn materials_cannot_be_added_to_terminal_jobs() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let estimate = fx.estimate_for(customer.id_typed(), dec!(10.00));
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();
    fx.service.cancel_job(job.id_typed()).unwrap();

    let material = fx.cement(dec!(5.00));
    let err = fx
        .service
        .add_job_material(job.id_typed(), material.id_typed(), qty(dec!(1)))
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition(_)));
}

#[test]
fn completing_a_job_with_no_materials_costs_zero() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let estimate = fx.estimate_for(customer.id_typed(), dec!(10.00));
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();

    let job = fx.service.complete_job(job.id_typed(), day(3, 9)).unwrap();
    assert_eq!(job.actual_cost(), Some(Money::ZERO));

    let invoice = fx.service.issue_invoice(job.id_typed(), day(3, 10)).unwrap();
    assert_eq!(invoice.amount(), Money::ZERO);
}

#[test]
fn deleting_a_customer_cascades_transitively() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let property = fx
        .store
        .create_property(NewProperty {
            customer_id: customer.id_typed(),
            address: "Plot 9, Karen Lane".to_string(),
            property_type: "residential".to_string(),
            description: String::new(),
        })
        .unwrap();

    let estimate = fx
        .service
        .create_estimate(NewEstimate {
            customer_id: customer.id_typed(),
            property_id: Some(property.id_typed()),
            visit_date: day(3, 1),
            initial_outline: String::new(),
            detailed_estimate: String::new(),
            total_cost: money(dec!(500.00)),
        })
        .unwrap();
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();
    let material = fx.cement(dec!(25.00));
    let line = fx
        .service
        .add_job_material(job.id_typed(), material.id_typed(), qty(dec!(2)))
        .unwrap();
    fx.service.complete_job(job.id_typed(), day(3, 9)).unwrap();
    let invoice = fx.service.issue_invoice(job.id_typed(), day(3, 10)).unwrap();
    let (payment, _) = fx
        .service
        .record_payment(
            invoice.id_typed(),
            money(dec!(50.00)),
            "cash".to_string(),
            None,
            day(3, 12),
        )
        .unwrap();

    fx.store.delete_customer(customer.id_typed()).unwrap();

    assert!(matches!(
        fx.store.get_customer(customer.id_typed()),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        fx.store.get_property(property.id_typed()),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        fx.store.get_estimate(estimate.id_typed()),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        fx.store.get_job(job.id_typed()),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        fx.store.get_job_material(line.id_typed()),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        fx.store.get_invoice(invoice.id_typed()),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        fx.store.get_payment(payment.id_typed()),
        Err(DomainError::NotFound(_))
    ));

    // The catalog material is not customer-owned and survives the cascade...
    // except its referencing line is gone, so it may now be deleted too.
    fx.store.get_material(material.id_typed()).unwrap();
    fx.store.delete_material(material.id_typed()).unwrap();
}

#[test]
fn racing_transitions_serialize_one_winner() {
    let fx = Fixture::new();
    let customer = fx.customer();
    let estimate = fx.estimate_for(customer.id_typed(), dec!(10.00));
    fx.service
        .accept_estimate(estimate.id_typed(), day(3, 2))
        .unwrap();
    let job = fx
        .service
        .schedule_job(estimate.id_typed(), day(3, 5), day(3, 4))
        .unwrap();
    let job_id = job.id_typed();

    let store = Arc::clone(&fx.store);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                scope.spawn(move || LifecycleService::new(store).start_job(job_id))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one racer may start the job");
    let loss = results.into_iter().find(|r| r.is_err()).unwrap().unwrap_err();
    assert!(matches!(loss, DomainError::InvalidTransition(_)));

    let job = fx.store.get_job(job_id).unwrap();
    assert_eq!(job.status(), JobStatus::InProgress);
}
