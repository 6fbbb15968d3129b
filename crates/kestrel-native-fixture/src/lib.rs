// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! A native module that counts how often it is installed

use std::sync::atomic::{AtomicU32, Ordering};

static INSTALLS: AtomicU32 = AtomicU32::new(0);

/// Install function looked up by the loader
#[unsafe(no_mangle)]
pub extern "C" fn kestrel_install() {
    INSTALLS.fetch_add(1, Ordering::SeqCst);
}

/// Number of times [`kestrel_install`] has run in this copy of the library
#[unsafe(no_mangle)]
pub extern "C" fn kestrel_fixture_installs() -> u32 {
    INSTALLS.load(Ordering::SeqCst)
}
