// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

// Env values used in wechat pay.
pub const WECHAT_PAY_APPID: &str = "WECHAT_PAY_APPID";
pub const WECHAT_PAY_MCH_ID: &str = "WECHAT_PAY_MCH_ID";
pub const WECHAT_PAY_KEY: &str = "WECHAT_PAY_KEY";
pub const WECHAT_PAY_SIGN_TYPE: &str = "WECHAT_PAY_SIGN_TYPE";
pub const WECHAT_PAY_NOTIFY_URL: &str = "WECHAT_PAY_NOTIFY_URL";
pub const WECHAT_PAY_SSL_CERT_PATH: &str = "WECHAT_PAY_SSL_CERT_PATH";
pub const WECHAT_PAY_SSL_KEY_PATH: &str = "WECHAT_PAY_SSL_KEY_PATH";

// Request and response fields.
pub const APPID: &str = "appid";
pub const MCH_ID: &str = "mch_id";
pub const NOTIFY_URL: &str = "notify_url";
pub const PREPAY_ID: &str = "prepay_id";

// JS bridge fields.
pub const JS_APP_ID: &str = "appId";
pub const JS_TIME_STAMP: &str = "timeStamp";
pub const JS_NONCE_STR: &str = "nonceStr";
pub const JS_PACKAGE: &str = "package";
pub const JS_SIGN_TYPE: &str = "signType";
pub const JS_PAY_SIGN: &str = "paySign";

/// Reply message sent back when the application doesn't provide one.
pub const DEFAULT_REPLY_MSG: &str = "OK";
