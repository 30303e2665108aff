//! `gocab contact` subcommand: submit a lead through the contact form

use clap::Args;

use crate::types::ContactSubmission;

/// Request a callback for a ride
#[derive(Args, Debug)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub email: Option<String>,

    /// Requested service (category slug, e.g. airport_transfer)
    #[arg(long)]
    pub service_type: String,

    #[arg(long, value_name = "PLACE")]
    pub pickup: Option<String>,

    #[arg(long = "drop", value_name = "PLACE")]
    pub drop_location: Option<String>,

    /// Travel date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Travel time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,

    #[arg(long)]
    pub passengers: Option<u32>,

    #[arg(long)]
    pub message: Option<String>,
}

impl ContactArgs {
    pub fn into_submission(self) -> ContactSubmission {
        ContactSubmission {
            name: self.name,
            phone: self.phone,
            email: self.email.unwrap_or_default(),
            service_type: self.service_type,
            pickup_location: self.pickup.unwrap_or_default(),
            drop_location: self.drop_location.unwrap_or_default(),
            travel_date: self.date.unwrap_or_default(),
            travel_time: self.time.unwrap_or_default(),
            passengers: self.passengers.map(|n| n.to_string()).unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        }
    }
}
