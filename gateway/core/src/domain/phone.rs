// Copyright (c) 2026 Verigate Contributors
// SPDX-License-Identifier: AGPL-3.0

/// Reduce a channel identity or claimed mobile to its digits.
///
/// `"+91 98765-43210"` and `"919876543210@s.whatsapp.net"` both normalize to a
/// bare E.164 digit string, which is the only form compared or signed.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
