use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;

mod admin;
mod earnings;
mod health_check;
mod plans;
mod subscriptions;
mod transactions;
mod users;

use admin::{check_admin, complete_expired_now, create_plan};
use earnings::{get_portfolio, run_accrual};
use plans::get_plans;
use subscriptions::{get_my_subscriptions, subscribe};
use transactions::{deposit, get_my_transactions, withdraw};
use users::{get_profile, login, register};

fn users_routes() -> Scope {
    scope("users")
        .service(register)
        .service(login)
        .service(get_profile)
}

fn plans_routes() -> Scope {
    scope("plans").service(get_plans)
}

fn subscriptions_routes() -> Scope {
    scope("subscriptions")
        .service(subscribe)
        .service(get_my_subscriptions)
}

fn transactions_routes() -> Scope {
    scope("transactions")
        .service(deposit)
        .service(withdraw)
        .service(get_my_transactions)
}

fn earnings_routes() -> Scope {
    scope("earnings").service(run_accrual)
}

fn portfolio_routes() -> Scope {
    scope("portfolio").service(get_portfolio)
}

fn admin_routes() -> Scope {
    scope("admin")
        .service(check_admin)
        .service(create_plan)
        .service(complete_expired_now)
}

fn util_routes() -> Scope {
    scope("").service(health_check::health_check)
}

pub fn gazoduc_invest_routes(conf: &mut ServiceConfig) {
    conf.service(
        scope("api/v1")
            .service(users_routes())
            .service(plans_routes())
            .service(subscriptions_routes())
            .service(transactions_routes())
            .service(earnings_routes())
            .service(portfolio_routes())
            .service(admin_routes())
            .service(util_routes()),
    );
}
