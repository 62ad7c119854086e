/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Routing and notify-resolution layer.
//!
//! Holds the entity key wildcard rules, the topic signature that scopes every
//! subscription, and the builder that turns one publish into per-consumer notifies.
//!
//! ```
//! use mo_broker::{matches, EntityKey};
//!
//! let required = EntityKey::new(Some("temp"), None, Some(3), None);
//!
//! assert!(matches(&required, &EntityKey::new(Some("temp"), Some(9), Some(3), Some(1))));
//! assert!(!matches(&required, &EntityKey::new(Some("temp"), Some(9), Some(4), Some(1))));
//! assert!(matches(&EntityKey::wildcard(), &required));
//! ```

pub(crate) mod entity_key;
pub(crate) mod notify_builder;
pub(crate) mod topic_signature;
