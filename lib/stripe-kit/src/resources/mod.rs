//! Resource route groups.
//!
//! Each module holds one resource: its response models, the parameter
//! structs of its operations, a marker type and the operations themselves,
//! implemented on [`Routes`](crate::Routes) for that marker.
//!
//! | Module | Path |
//! |---|---|
//! | [`balance`] | `/balance` |
//! | [`balance_transactions`] | `/balance_transactions` |
//! | [`bank_accounts`] | `/customers/{customer}/sources` (bank accounts) |
//! | [`cards`] | `/customers/{customer}/sources` (cards) |
//! | [`charges`] | `/charges` |
//! | [`customers`] | `/customers` |
//! | [`disputes`] | `/disputes` |
//! | [`events`] | `/events` |
//! | [`file_links`] | `/file_links` |
//! | [`files`] | `/files` (uploads go to the files host) |
//! | [`invoices`] | `/invoices` |
//! | [`payment_intents`] | `/payment_intents` |
//! | [`payment_methods`] | `/payment_methods` |
//! | [`prices`] | `/prices` |
//! | [`products`] | `/products` |
//! | [`refunds`] | `/refunds` |
//! | [`setup_intents`] | `/setup_intents` |
//! | [`sources`] | `/sources` |
//! | [`tokens`] | `/tokens` |

pub mod balance;
pub mod balance_transactions;
pub mod bank_accounts;
pub mod cards;
pub mod charges;
pub mod customers;
pub mod disputes;
pub mod events;
pub mod file_links;
pub mod files;
pub mod invoices;
pub mod payment_intents;
pub mod payment_methods;
pub mod prices;
pub mod products;
pub mod refunds;
pub mod setup_intents;
pub mod sources;
pub mod tokens;
