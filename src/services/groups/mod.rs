pub mod classes;
pub mod group;
pub mod members;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::AppContext;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::models::groups::requests::{
    CreateClassRequest, CreateGroupRequest, MemberListQuery, UpsertMemberRequest,
};

pub struct GroupService;

impl GroupService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn create_group(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        req: CreateGroupRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let group = group::create_group(&ctx, user, req).await?;
        Ok(HttpResponse::Created().json(ApiResponse::success(group, "群组创建成功")))
    }

    pub async fn list_my_groups(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let groups = group::list_my_groups(&ctx, user).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(groups, "查询成功")))
    }

    pub async fn get_group(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let group = group::get_group(&ctx, user, group_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(group, "查询成功")))
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        req: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let class = classes::create_class(&ctx, user, group_id, req).await?;
        Ok(HttpResponse::Created().json(ApiResponse::success(class, "班级创建成功")))
    }

    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let classes = classes::list_classes(&ctx, user, group_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "查询成功")))
    }

    pub async fn upsert_member(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        req: UpsertMemberRequest,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let member = members::upsert_member(&ctx, user, group_id, req).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(member, "成员已保存")))
    }

    pub async fn list_members(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        query: MemberListQuery,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        let members = members::list_members(&ctx, user, group_id, query).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(members, "查询成功")))
    }

    pub async fn remove_member(
        &self,
        request: &HttpRequest,
        user: &CurrentUser,
        group_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        let ctx = AppContext::from_request(request)?;
        members::remove_member(&ctx, user, group_id, user_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("成员已移除")))
    }
}
