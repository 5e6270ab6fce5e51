use anyhow::Context;
use nota_auth::{Totp, TotpParams};
use nota_config::NotaConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct OtpResponse {
    code: String,
    remaining_secs: u64,
}

/// Handle `nota otp`.
pub fn handle(flags: &GlobalFlags, config: &NotaConfig) -> anyhow::Result<()> {
    let params = TotpParams {
        step_secs: config.otp.step_secs,
        digits: config.otp.digits,
    };
    let totp = Totp::new(config.otp.secret(), params).context("cannot generate one-time code")?;

    let window = totp.window_now();
    output(
        &OtpResponse {
            code: window.code,
            remaining_secs: window.remaining_secs,
        },
        flags.format,
    )
}
