mod classification;
mod filter;
mod identity;
mod notice;
mod report;
mod stats;
mod ticket_number;
mod view;

#[rustfmt::skip]
pub use {
    classification::*,
    filter::*,
    identity::*,
    notice::*,
    report::*,
    stats::*,
    ticket_number::*,
    view::*,
};
