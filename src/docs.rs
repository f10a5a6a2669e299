use crate::api::attendance::{ConsolidateRequest, ConsolidateResponse, OrganizeResponse};
use crate::api::leave::{CreateLeaveRequest, UpdateLeaveStatus};
use crate::api::payroll::{CreatePayStructure, ProcessPayrollRequest, ProcessPayrollResponse};
use crate::api::payslip::{SendPayslipRequest, SendPayslipResponse};
use crate::api::permission::{CreatePermission, UpdatePermissionStatus};
use crate::api::shift::{CreateShiftMapping, CreateShiftMaster, ShiftOption};
use crate::api::users::{ApproveUserRequest, RegisterRequest, RejectUserRequest};
use crate::model::attendance::{ConsolidatedAttendance, OrganizedAttendanceRecord};
use crate::model::leave::{LeaveRequest, Permission};
use crate::model::payroll::{PayStructure, PayrollProcessingRecord};
use crate::model::shift::{ShiftMapping, ShiftMaster};
use crate::model::user::User;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Administration API",
        version = "1.0.0",
        description = r#"
## Attendance and Payroll Administration

This API drives the monthly attendance-to-payroll pipeline together with the
surrounding HR administration screens.

### 🔹 Key Features
- **Attendance Pipeline**
  - Upload the fixed-layout timesheet workbook, organize it into per-day
    records, consolidate into per-employee monthly totals
- **Payroll Processing**
  - Prorate each employee's pay structure by attendance and store the result
- **Payslip Delivery**
  - Render and email one payslip per processed payroll row
- **Shift, Registration, Leave & Permission Administration**

### 📦 Response Format
- JSON-based RESTful responses
- Admin notifications streamed over `GET /api/events` (SSE)

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::organize_attendance,
        crate::api::attendance::consolidate_attendance,
        crate::api::attendance::consolidated_attendance_data,

        crate::api::payroll::process_payroll,
        crate::api::payroll::create_pay_structure,
        crate::api::payroll::list_pay_structures,

        crate::api::payslip::send_payslip,

        crate::api::shift::list_shift_options,
        crate::api::shift::list_shift_masters,
        crate::api::shift::create_shift_master,
        crate::api::shift::list_shift_mappings,
        crate::api::shift::create_shift_mapping,

        crate::api::users::register,
        crate::api::users::pending_users,
        crate::api::users::approve_user,
        crate::api::users::reject_user,

        crate::api::leave::list_leave_requests,
        crate::api::leave::create_leave_request,
        crate::api::leave::update_leave_status,

        crate::api::permission::list_permissions,
        crate::api::permission::create_permission,
        crate::api::permission::update_permission_status,

        crate::api::events::event_stream
    ),
    components(
        schemas(
            OrganizeResponse,
            ConsolidateRequest,
            ConsolidateResponse,
            OrganizedAttendanceRecord,
            ConsolidatedAttendance,
            ProcessPayrollRequest,
            ProcessPayrollResponse,
            PayrollProcessingRecord,
            CreatePayStructure,
            PayStructure,
            SendPayslipRequest,
            SendPayslipResponse,
            ShiftMaster,
            ShiftMapping,
            ShiftOption,
            CreateShiftMaster,
            CreateShiftMapping,
            RegisterRequest,
            ApproveUserRequest,
            RejectUserRequest,
            User,
            LeaveRequest,
            CreateLeaveRequest,
            UpdateLeaveStatus,
            Permission,
            CreatePermission,
            UpdatePermissionStatus
        )
    ),
    tags(
        (name = "Attendance", description = "Timesheet organize/consolidate APIs"),
        (name = "Payroll", description = "Payroll processing and pay structures"),
        (name = "Payslip", description = "Payslip rendering and delivery"),
        (name = "Shift", description = "Shift masters and employee mappings"),
        (name = "Users", description = "Registration approval workflow"),
        (name = "Leave", description = "Leave request APIs"),
        (name = "Permission", description = "Hourly permission APIs"),
        (name = "Events", description = "Admin notification stream"),
    )
)]
pub struct ApiDoc;
